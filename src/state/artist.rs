//! State of the opened artist page.

use crate::spotify::{Album, Artist, SpotifyError};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ArtistState {
    artist_id: Option<String>,
    artist: Option<Artist>,
    albums: Vec<Album>,
    saved: HashMap<String, bool>, // album ID -> in library
    pending: Option<String>,      // album ID with a save/remove in flight
    loading: bool,
    error: Option<String>,
}

impl ArtistState {
    /// Start loading the artist, discarding whatever was shown before.
    ///
    pub fn begin(&mut self, artist_id: &str) {
        *self = ArtistState {
            artist_id: Some(artist_id.to_owned()),
            loading: true,
            ..ArtistState::default()
        };
    }

    pub fn artist_id(&self) -> Option<&str> {
        self.artist_id.as_deref()
    }

    pub fn artist(&self) -> Option<&Artist> {
        self.artist.as_ref()
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saved(&self, album_id: &str) -> bool {
        self.saved.get(album_id).copied().unwrap_or(false)
    }

    pub fn is_pending(&self, album_id: &str) -> bool {
        self.pending.as_deref() == Some(album_id)
    }

    /// Store the loaded artist. Ignored if another artist was opened since.
    ///
    pub fn apply_artist(&mut self, artist: Artist, albums: Vec<Album>, saved: Vec<bool>) {
        if self.artist_id.as_deref() != Some(artist.id.as_str()) {
            return;
        }
        self.saved = albums
            .iter()
            .map(|album| album.id.clone())
            .zip(saved.into_iter().chain(std::iter::repeat(false)))
            .collect();
        self.artist = Some(artist);
        self.albums = albums;
        self.loading = false;
        self.error = None;
    }

    pub fn apply_error(&mut self, artist_id: &str, error: &SpotifyError) {
        if self.artist_id.as_deref() != Some(artist_id) {
            return;
        }
        self.error = Some(error.user_message().to_string());
        self.loading = false;
    }

    /// Mark a save/remove as in flight. Returns false if one already is.
    ///
    pub fn begin_toggle(&mut self, album_id: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(album_id.to_owned());
        self.error = None;
        true
    }

    /// Record the album's new library status. The in-flight marker is only
    /// released by the toggle that set it.
    ///
    pub fn apply_saved(&mut self, album_id: &str, saved: bool) {
        if self.saved.contains_key(album_id) {
            self.saved.insert(album_id.to_owned(), saved);
        }
        if self.is_pending(album_id) {
            self.pending = None;
        }
    }

    /// Ignored unless the failed toggle is the one in flight on this page.
    ///
    pub fn apply_toggle_error(&mut self, album_id: &str, error: &SpotifyError) {
        if !self.is_pending(album_id) {
            return;
        }
        self.pending = None;
        self.error = Some(error.user_message().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn applies_only_the_requested_artist() {
        let mut state = ArtistState::default();
        let artist: Artist = Faker.fake();
        state.begin("someone-else");
        state.apply_artist(artist.clone(), vec![], vec![]);
        assert!(state.artist().is_none());
        assert!(state.is_loading());

        state.begin(&artist.id);
        let albums: Vec<Album> = vec![Faker.fake(), Faker.fake()];
        state.apply_artist(artist.clone(), albums.clone(), vec![true]);
        assert_eq!(state.artist(), Some(&artist));
        assert!(state.is_saved(&albums[0].id));
        assert!(!state.is_saved(&albums[1].id));
        assert!(!state.is_loading());
    }

    #[test]
    fn toggle_round_trip() {
        let mut state = ArtistState::default();
        let artist: Artist = Faker.fake();
        let album: Album = Faker.fake();
        state.begin(&artist.id);
        state.apply_artist(artist, vec![album.clone()], vec![false]);

        assert!(state.begin_toggle(&album.id));
        assert!(!state.begin_toggle(&album.id));
        assert!(state.is_pending(&album.id));
        state.apply_saved(&album.id, true);
        assert!(state.is_saved(&album.id));
        assert!(!state.is_pending(&album.id));

        assert!(state.begin_toggle(&album.id));
        state.apply_toggle_error(
            &album.id,
            &SpotifyError::Forbidden {
                message: "Insufficient client scope".to_string(),
            },
        );
        assert!(state.is_saved(&album.id));
        assert_eq!(state.error(), Some("You don't have permission to do that."));
    }

    #[test]
    fn late_toggle_from_previous_artist_keeps_pending() {
        let mut state = ArtistState::default();
        let first: Album = Faker.fake();
        let second: Album = Faker.fake();
        let artist: Artist = Faker.fake();
        state.begin(&artist.id);
        state.apply_artist(artist, vec![second.clone()], vec![false]);
        assert!(state.begin_toggle(&second.id));

        state.apply_saved(&first.id, true);
        assert!(state.is_pending(&second.id));
        state.apply_toggle_error(
            &first.id,
            &SpotifyError::Network("connection reset".to_string()),
        );
        assert!(state.is_pending(&second.id));
        assert_eq!(state.error(), None);

        state.apply_saved(&second.id, true);
        assert!(!state.is_pending(&second.id));
        assert!(state.is_saved(&second.id));
    }
}
