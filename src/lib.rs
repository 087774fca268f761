//! Terminal client for searching Spotify artists and managing the albums
//! saved in the user's library.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod spotify;
pub mod state;
pub mod ui;
pub mod utils;
