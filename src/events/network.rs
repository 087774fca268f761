use crate::spotify::{Album, Artist, Spotify, SpotifyError};
use crate::state::{PageRequest, SearchRequest, State};
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    Me,
    Search(SearchRequest),
    OpenArtist { id: String },
    SavedAlbums(PageRequest),
    ToggleSaved { album_id: String, save: bool },
    RemoveSaved { album_id: String },
}

/// Specify struct for managing state with network events.
///
pub struct Handler<'a> {
    state: &'a Arc<Mutex<State>>,
    spotify: &'a Spotify,
}

impl<'a> Handler<'a> {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &'a Arc<Mutex<State>>, spotify: &'a Spotify) -> Self {
        Handler { state, spotify }
    }

    /// Handle network events by type. API failures end up in the state; only
    /// unexpected faults are returned.
    ///
    pub async fn handle(&mut self, event: Event) -> Result<()> {
        debug!("Processing network event '{:?}'...", event);
        match event {
            Event::Me => self.me().await?,
            Event::Search(request) => self.search(request).await?,
            Event::OpenArtist { id } => self.open_artist(id).await?,
            Event::SavedAlbums(request) => self.saved_albums(request).await?,
            Event::ToggleSaved { album_id, save } => self.toggle_saved(album_id, save).await?,
            Event::RemoveSaved { album_id } => self.remove_saved(album_id).await?,
        }
        Ok(())
    }

    /// Update state with user details, completing sign-in.
    ///
    async fn me(&mut self) -> Result<()> {
        info!("Fetching user details...");
        match self.spotify.me().await {
            Ok(user) => {
                self.state.lock().await.set_user(user);
            }
            Err(e) => {
                log_failure("Loading user details", &e);
                let mut state = self.state.lock().await;
                if e.is_authentication() {
                    state.expire_session(e.user_message());
                } else {
                    state.fail_sign_in(e.user_message());
                }
            }
        }
        Ok(())
    }

    /// Run one artist search and hand the page to the search state, which
    /// drops it if a newer search has started since.
    ///
    async fn search(&mut self, request: SearchRequest) -> Result<()> {
        info!(
            "Searching artists for '{}' (page {})...",
            request.query, request.page
        );
        let result = self
            .spotify
            .search_artists(&request.query, request.limit, request.offset)
            .await;
        let mut state = self.state.lock().await;
        let applied = match result {
            Ok(page) => state.search_mut().apply_results(request.generation, page),
            Err(e) => {
                log_failure("Search", &e);
                state.search_mut().apply_error(request.generation, &e)
            }
        };
        if !applied {
            debug!("Discarded stale response for '{}'.", request.query);
        }
        Ok(())
    }

    /// Load the artist, its albums and their saved flags.
    ///
    async fn open_artist(&mut self, id: String) -> Result<()> {
        info!("Fetching artist {}...", id);
        match self.load_artist(&id).await {
            Ok((artist, albums, saved)) => {
                info!("Loaded {} albums for '{}'.", albums.len(), artist.name);
                self.state
                    .lock()
                    .await
                    .artist_mut()
                    .apply_artist(artist, albums, saved);
            }
            Err(e) => {
                log_failure("Loading artist", &e);
                self.state.lock().await.artist_mut().apply_error(&id, &e);
            }
        }
        Ok(())
    }

    async fn load_artist(
        &self,
        id: &str,
    ) -> Result<(Artist, Vec<Album>, Vec<bool>), SpotifyError> {
        let artist = self.spotify.artist(id).await?;
        let albums = self.spotify.artist_albums(id).await?;
        let ids: Vec<String> = albums.iter().map(|album| album.id.clone()).collect();
        let saved = if ids.is_empty() {
            vec![]
        } else {
            self.spotify.albums_saved(&ids).await?
        };
        Ok((artist, albums, saved))
    }

    /// Fetch one page of the library.
    ///
    async fn saved_albums(&mut self, request: PageRequest) -> Result<()> {
        info!("Fetching saved albums at offset {}...", request.offset);
        let result = self
            .spotify
            .saved_albums(request.limit, request.offset)
            .await;
        let mut state = self.state.lock().await;
        match result {
            Ok(page) => {
                state.set_saved_page(request, page.items);
            }
            Err(e) => {
                log_failure("Loading saved albums", &e);
                state.saved_mut().apply_error(&e);
            }
        }
        Ok(())
    }

    /// Save or remove an album from the artist page. A change marks the
    /// library stale so it reloads when next shown.
    ///
    async fn toggle_saved(&mut self, album_id: String, save: bool) -> Result<()> {
        let ids = [album_id.clone()];
        let result = if save {
            info!("Saving album {}...", album_id);
            self.spotify.save_albums(&ids).await
        } else {
            info!("Removing album {}...", album_id);
            self.spotify.remove_albums(&ids).await
        };
        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                state.artist_mut().apply_saved(&album_id, save);
                state.saved_mut().mark_stale();
            }
            Err(e) => {
                log_failure("Updating library", &e);
                state.artist_mut().apply_toggle_error(&album_id, &e);
            }
        }
        Ok(())
    }

    /// Remove an album from the library view.
    ///
    async fn remove_saved(&mut self, album_id: String) -> Result<()> {
        let result = self.spotify.remove_albums(&[album_id.clone()]).await;
        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                info!("Removed album {} from library.", album_id);
                state.set_saved_album_removed(&album_id);
            }
            Err(e) => {
                log_failure("Removing album", &e);
                state.saved_mut().apply_remove_error(&e);
            }
        }
        Ok(())
    }
}

/// Authentication failures are handled by the session callback, so they are
/// only worth a warning here.
///
fn log_failure(action: &str, error: &SpotifyError) {
    match error.status() {
        _ if error.is_authentication() => warn!("{} failed: {}", action, error),
        Some(status) => error!("{} failed with HTTP {}: {}", action, status, error),
        None => error!("{} failed: {}", action, error),
    }
}
