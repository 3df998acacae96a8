pub mod slug;

pub use slug::{generate_landing_slug, landing_token, normalize_landing_slug};
