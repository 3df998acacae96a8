//! Game Catalog API - Backend for a game catalog with landing pages
//!
//! This crate provides:
//! - A REST API to create, list, rename and delete games and set their download links
//! - Image ingestion to local disk or a remote asset host
//! - Public landing page artifacts and download redirects
//! - A typed client for the public catalog

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod utils;
