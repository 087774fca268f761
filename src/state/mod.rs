//! Application state management module.
//!
//! This module contains the core state management for the application, including:
//! - Main `State` struct that holds all application data
//! - Debounced artist search and the saved-album library
//! - Navigation types (View)
//! - State error handling

mod artist;
mod debounce;
mod error;
mod navigation;
mod saved;
mod search;
mod state_impl;

pub use artist::ArtistState;
pub use debounce::Debounce;
pub use error::StateError;
pub use navigation::View;
pub use saved::{group_by_artist, AlbumGroup, PageRequest, SavedAlbumsState, UNKNOWN_ARTIST};
pub use search::{SearchPhase, SearchRequest, SearchState};
pub use state_impl::State;
