//! Navigation-related state types.
//!
//! This module contains the views the application can show.

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Welcome,
    Search,
    Artist,
    SavedAlbums,
}

impl View {
    /// Return the title shown above the view.
    ///
    pub fn title(&self) -> &'static str {
        match self {
            View::Welcome => "Welcome",
            View::Search => "Search Artists",
            View::Artist => "Artist",
            View::SavedAlbums => "Saved Albums",
        }
    }
}
