pub mod game;

pub use game::{
    CreateGameForm, GameResponse, MessageResponse, UpdateGameNameRequest, UpdateGameUrlRequest,
    ValidatedGame,
};
