//! Saved-album library state with offset pagination.

use crate::spotify::{SavedAlbum, SpotifyError};
use log::*;
use std::collections::HashMap;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Group name for albums without any artist.
///
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A page of the library the network worker should fetch.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

/// Albums sharing the same first artist.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumGroup {
    pub artist: String,
    pub albums: Vec<SavedAlbum>,
}

/// Fold the albums into groups keyed by their first artist's name. Groups
/// appear in first-seen order and keep the album order within each group.
///
pub fn group_by_artist(items: &[SavedAlbum]) -> Vec<AlbumGroup> {
    let mut groups: Vec<AlbumGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for item in items {
        let artist = item
            .album
            .artists
            .first()
            .map(|artist| artist.name.as_str())
            .unwrap_or(UNKNOWN_ARTIST);
        match index.get(artist) {
            Some(&position) => groups[position].albums.push(item.clone()),
            None => {
                index.insert(artist, groups.len());
                groups.push(AlbumGroup {
                    artist: artist.to_string(),
                    albums: vec![item.clone()],
                });
            }
        }
    }
    groups
}

/// Houses the accumulated library pages.
///
#[derive(Debug)]
pub struct SavedAlbumsState {
    items: Vec<SavedAlbum>,
    revision: u64,
    grouped: Option<(u64, Vec<AlbumGroup>)>,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    offset: u32,
    page_size: u32,
    loaded: bool,
    stale: bool,
}

impl Default for SavedAlbumsState {
    fn default() -> Self {
        SavedAlbumsState::new(DEFAULT_PAGE_SIZE)
    }
}

impl SavedAlbumsState {
    pub fn new(page_size: u32) -> Self {
        SavedAlbumsState {
            items: vec![],
            revision: 0,
            grouped: None,
            loading: false,
            error: None,
            has_more: true,
            offset: 0,
            page_size: page_size.max(1),
            loaded: false,
            stale: false,
        }
    }

    pub fn items(&self) -> &[SavedAlbum] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Whether the library should be (re)fetched when shown.
    ///
    pub fn needs_load(&self) -> bool {
        !self.loading && (!self.loaded || self.stale)
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Return the groups for the current items, recomputing them only when
    /// the items changed since the last call.
    ///
    pub fn grouped_by_artist(&mut self) -> &[AlbumGroup] {
        let revision = self.revision;
        let fresh = matches!(&self.grouped, Some((computed, _)) if *computed == revision);
        if !fresh {
            self.grouped = Some((revision, group_by_artist(&self.items)));
        }
        match &self.grouped {
            Some((_, groups)) => groups,
            None => &[],
        }
    }

    /// Start fetching the first page; its result replaces the list.
    ///
    pub fn begin_load(&mut self) -> PageRequest {
        self.loading = true;
        self.error = None;
        self.stale = false;
        PageRequest {
            offset: 0,
            limit: self.page_size,
        }
    }

    /// Start fetching the next page, unless a fetch is running or the
    /// library is exhausted. Removals shrink the server-side list, so the
    /// next page starts after the albums already held.
    ///
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(PageRequest {
            offset: self.items.len() as u32,
            limit: self.page_size,
        })
    }

    pub fn apply_page(&mut self, request: PageRequest, items: Vec<SavedAlbum>) {
        self.has_more = items.len() as u32 == self.page_size;
        if request.offset == 0 {
            self.items = items;
        } else {
            self.items.extend(items);
        }
        self.offset = request.offset;
        self.revision += 1;
        self.loading = false;
        self.loaded = true;
        debug!(
            "Saved albums now {} (offset {}, more: {})",
            self.items.len(),
            self.offset,
            self.has_more
        );
    }

    pub fn apply_error(&mut self, error: &SpotifyError) {
        self.error = Some(error.user_message().to_string());
        self.loading = false;
    }

    /// Drop the album after the API confirmed its removal.
    ///
    pub fn apply_removed(&mut self, album_id: &str) {
        let before = self.items.len();
        self.items.retain(|item| item.album.id != album_id);
        if self.items.len() != before {
            self.revision += 1;
        }
        self.error = None;
    }

    pub fn apply_remove_error(&mut self, error: &SpotifyError) {
        self.error = Some(error.user_message().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::{Album, ArtistRef};

    fn saved(id: &str, artist: Option<&str>) -> SavedAlbum {
        SavedAlbum {
            added_at: None,
            album: Album {
                id: id.to_string(),
                name: format!("Album {}", id),
                album_type: "album".to_string(),
                release_date: None,
                total_tracks: 10,
                artists: artist
                    .map(|name| {
                        vec![ArtistRef {
                            id: name.to_lowercase(),
                            name: name.to_string(),
                        }]
                    })
                    .unwrap_or_default(),
                url: None,
            },
        }
    }

    fn full_page(prefix: &str, size: u32) -> Vec<SavedAlbum> {
        (0..size)
            .map(|i| saved(&format!("{}{}", prefix, i), Some("Artist")))
            .collect()
    }

    #[test]
    fn grouping_uses_sentinel_and_keeps_order() {
        let items = vec![
            saved("1", Some("ABBA")),
            saved("2", None),
            saved("3", Some("Queen")),
            saved("4", Some("ABBA")),
        ];
        let groups = group_by_artist(&items);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].artist, "ABBA");
        let ids: Vec<&str> = groups[0].albums.iter().map(|a| a.album.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(groups[1].artist, UNKNOWN_ARTIST);
        assert_eq!(groups[2].artist, "Queen");
    }

    #[test]
    fn first_page_replaces_and_more_pages_append() {
        let mut saved_state = SavedAlbumsState::new(2);
        let request = saved_state.begin_load();
        assert_eq!(request.offset, 0);
        saved_state.apply_page(request, full_page("a", 2));
        assert!(saved_state.has_more());

        let more = saved_state.load_more().unwrap();
        assert_eq!(more.offset, 2);
        saved_state.apply_page(more, vec![saved("b0", None)]);
        assert_eq!(saved_state.items().len(), 3);
        assert_eq!(saved_state.offset(), 2);
        assert!(!saved_state.has_more());

        let reload = saved_state.begin_load();
        saved_state.apply_page(reload, vec![saved("c0", None)]);
        assert_eq!(saved_state.items().len(), 1);
    }

    #[test]
    fn load_more_after_removal_does_not_skip_albums() {
        let mut saved_state = SavedAlbumsState::new(3);
        let request = saved_state.begin_load();
        saved_state.apply_page(request, full_page("a", 3));
        saved_state.apply_removed("a1");

        let more = saved_state.load_more().unwrap();
        assert_eq!(more.offset, 2);
        saved_state.apply_page(more, full_page("b", 3));
        assert_eq!(saved_state.items().len(), 5);
        assert_eq!(saved_state.load_more().unwrap().offset, 5);
    }

    #[test]
    fn load_more_is_noop_when_exhausted_or_loading() {
        let mut saved_state = SavedAlbumsState::new(50);
        let request = saved_state.begin_load();
        assert_eq!(saved_state.load_more(), None);
        saved_state.apply_page(request, vec![saved("1", None)]);
        assert!(!saved_state.has_more());
        assert_eq!(saved_state.load_more(), None);
        assert!(!saved_state.is_loading());
    }

    #[test]
    fn grouping_is_recomputed_after_changes() {
        let mut saved_state = SavedAlbumsState::new(50);
        let request = saved_state.begin_load();
        saved_state.apply_page(
            request,
            vec![saved("album1", Some("ABBA")), saved("album2", Some("ABBA"))],
        );
        assert_eq!(saved_state.grouped_by_artist()[0].albums.len(), 2);

        saved_state.apply_removed("album1");
        assert_eq!(saved_state.items().len(), 1);
        let groups = saved_state.grouped_by_artist();
        assert_eq!(groups[0].albums.len(), 1);
        assert_eq!(groups[0].albums[0].album.id, "album2");
    }

    #[test]
    fn remove_error_keeps_items() {
        let mut saved_state = SavedAlbumsState::new(50);
        let request = saved_state.begin_load();
        saved_state.apply_page(request, vec![saved("album1", Some("ABBA"))]);
        saved_state.apply_remove_error(&SpotifyError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(saved_state.items().len(), 1);
        assert_eq!(
            saved_state.error(),
            Some("Spotify is temporarily unavailable. Please try again later.")
        );
    }

    #[test]
    fn stale_library_needs_reload() {
        let mut saved_state = SavedAlbumsState::new(50);
        assert!(saved_state.needs_load());
        let request = saved_state.begin_load();
        assert!(!saved_state.needs_load());
        saved_state.apply_page(request, vec![]);
        assert!(!saved_state.needs_load());
        saved_state.mark_stale();
        assert!(saved_state.needs_load());
    }
}
