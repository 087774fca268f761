use super::artist::ArtistState;
use super::error::StateError;
use super::navigation::View;
use super::saved::{PageRequest, SavedAlbumsState};
use super::search::SearchState;
use crate::app::{ConfigSaveSender, NetworkEventSender};
use crate::config::{Config, ConfigUpdate};
use crate::events::network::Event as NetworkEvent;
use crate::spotify::{Album, Artist, SavedAlbum, SharedToken, User};
use crate::ui::SPINNER_FRAME_COUNT;
use crate::utils::links;
use clipboard::{ClipboardContext, ClipboardProvider};
use log::*;
use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

/// Maximum number of log lines kept for the log panel.
///
const MAX_LOG_ENTRIES: usize = 500;

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    config_save_sender: Option<ConfigSaveSender>,
    token: SharedToken,
    user: Option<User>,
    spinner_index: usize,
    view_stack: Vec<View>,
    search: SearchState,
    search_list_state: ListState,
    artist: ArtistState,
    albums_list_state: ListState,
    saved: SavedAlbumsState,
    saved_list_state: ListState,
    show_log: bool,
    log_entries: Vec<String>,
    access_token_input: String,
    has_access_token: bool,
    auth_error: Option<String>,
    status_message: Option<String>,
    theme: crate::ui::Theme,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            config_save_sender: None,
            token: SharedToken::default(),
            user: None,
            spinner_index: 0,
            view_stack: vec![View::Welcome],
            search: SearchState::default(),
            search_list_state: ListState::default(),
            artist: ArtistState::default(),
            albums_list_state: ListState::default(),
            saved: SavedAlbumsState::default(),
            saved_list_state: ListState::default(),
            show_log: false,
            log_entries: vec![],
            access_token_input: String::new(),
            has_access_token: false,
            auth_error: None,
            status_message: None,
            theme: crate::ui::Theme::default(),
        }
    }
}

impl State {
    /// Return new state wired to the network worker and config saver.
    ///
    pub fn new(
        net_sender: NetworkEventSender,
        config_save_sender: ConfigSaveSender,
        token: SharedToken,
        config: &Config,
    ) -> Self {
        let has_access_token = config.access_token.is_some();
        State {
            net_sender: Some(net_sender),
            config_save_sender: Some(config_save_sender),
            token,
            search: SearchState::new(
                Duration::from_millis(config.search_debounce_ms),
                config.search_page_size,
            ),
            saved: SavedAlbumsState::new(config.saved_page_size),
            has_access_token,
            theme: crate::ui::Theme::by_name(&config.theme_name),
            ..State::default()
        }
    }

    /// Send an event to the network worker.
    ///
    fn dispatch(&self, event: NetworkEvent) {
        let result = match &self.net_sender {
            Some(sender) => sender
                .send(event)
                .map_err(|e| StateError::NetworkUnavailable(e.to_string())),
            None => Err(StateError::NetworkUnavailable(
                "no network worker".to_string(),
            )),
        };
        if let Err(e) = result {
            error!("Failed to dispatch network event: {}", e);
        }
    }

    fn save_config(&self, update: ConfigUpdate) {
        let result = match &self.config_save_sender {
            Some(sender) => sender
                .send(update)
                .map_err(|e| StateError::ConfigUnavailable(e.to_string())),
            None => Err(StateError::ConfigUnavailable("no config saver".to_string())),
        };
        if let Err(e) = result {
            error!("Failed to request config save: {}", e);
        }
    }

    pub fn get_theme(&self) -> &crate::ui::Theme {
        &self.theme
    }

    pub fn get_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Store the signed-in user and leave the welcome screen.
    ///
    pub fn set_user(&mut self, user: User) -> &mut Self {
        info!("Signed in as {}.", user.name());
        self.user = Some(user);
        self.has_access_token = true;
        self.auth_error = None;
        if self.current_view() == &View::Welcome {
            self.view_stack = vec![View::Search];
        }
        self
    }

    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        self
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Advance timers: spinner frames and the search debounce.
    ///
    pub fn on_tick(&mut self, now: Instant) -> &mut Self {
        self.advance_spinner_index();
        if let Some(request) = self.search.poll(now) {
            self.search_list_state.select(None);
            self.dispatch(NetworkEvent::Search(request));
        }
        self
    }

    pub fn current_view(&self) -> &View {
        self.view_stack.last().unwrap_or(&View::Welcome)
    }

    pub fn push_view(&mut self, view: View) -> &mut Self {
        debug!("Pushing view {:?}", view);
        self.view_stack.push(view);
        self
    }

    /// Return to the previous view. The bottom view is never popped.
    ///
    pub fn pop_view(&mut self) -> Option<View> {
        if self.view_stack.len() > 1 {
            self.status_message = None;
            return self.view_stack.pop();
        }
        None
    }

    /// The section at the bottom of the view stack.
    ///
    pub fn root_view(&self) -> View {
        *self.view_stack.first().unwrap_or(&View::Welcome)
    }

    pub fn view_stack_len(&self) -> usize {
        self.view_stack.len()
    }

    /// Toggle between the search and the library, dropping any opened artist.
    ///
    pub fn switch_section(&mut self) -> &mut Self {
        match self.view_stack.first() {
            Some(View::SavedAlbums) => {
                self.view_stack = vec![View::Search];
            }
            Some(View::Search) => {
                self.view_stack = vec![View::SavedAlbums];
                self.ensure_saved_loaded();
            }
            _ => {}
        }
        self.status_message = None;
        self
    }

    pub fn get_status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    // Search

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn add_search_char(&mut self, c: char, now: Instant) -> &mut Self {
        self.search.push_char(c, now);
        self
    }

    pub fn remove_search_char(&mut self, now: Instant) -> &mut Self {
        self.search.pop_char(now);
        self
    }

    pub fn clear_search(&mut self, now: Instant) -> &mut Self {
        self.search.set_query("", now);
        self.search_list_state.select(None);
        self
    }

    pub fn retry_search(&mut self) -> &mut Self {
        if let Some(request) = self.search.retry() {
            info!("Retrying search for '{}'...", request.query);
            self.dispatch(NetworkEvent::Search(request));
        }
        self
    }

    pub fn next_search_page(&mut self) -> &mut Self {
        if let Some(request) = self.search.next_page() {
            self.search_list_state.select(None);
            self.dispatch(NetworkEvent::Search(request));
        }
        self
    }

    pub fn previous_search_page(&mut self) -> &mut Self {
        if let Some(request) = self.search.previous_page() {
            self.search_list_state.select(None);
            self.dispatch(NetworkEvent::Search(request));
        }
        self
    }

    pub fn search_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }

    pub fn get_search_list_state(&mut self) -> &mut ListState {
        if self.search_list_state.selected().is_none() && !self.search.results().is_empty() {
            self.search_list_state.select(Some(0));
        }
        &mut self.search_list_state
    }

    pub fn next_search_result(&mut self) -> &mut Self {
        next_index(&mut self.search_list_state, self.search.results().len());
        self
    }

    pub fn previous_search_result(&mut self) -> &mut Self {
        previous_index(&mut self.search_list_state, self.search.results().len());
        self
    }

    pub fn selected_search_result(&self) -> Option<&Artist> {
        let results = self.search.results();
        if results.is_empty() {
            return None;
        }
        results.get(self.search_list_state.selected().unwrap_or(0))
    }

    /// Open the artist linked in the query, or the selected result.
    ///
    pub fn open_selected_artist(&mut self) -> &mut Self {
        let artist_id = links::artist_id(self.search.query())
            .or_else(|| self.selected_search_result().map(|artist| artist.id.clone()));
        match artist_id {
            Some(id) => self.open_artist(&id),
            None => {
                debug!("{}", StateError::NothingSelected);
                self
            }
        }
    }

    pub fn open_artist(&mut self, artist_id: &str) -> &mut Self {
        info!("Opening artist {}...", artist_id);
        self.artist.begin(artist_id);
        self.albums_list_state.select(None);
        self.push_view(View::Artist);
        self.dispatch(NetworkEvent::OpenArtist {
            id: artist_id.to_owned(),
        });
        self
    }

    // Artist

    pub fn artist(&self) -> &ArtistState {
        &self.artist
    }

    pub fn artist_mut(&mut self) -> &mut ArtistState {
        &mut self.artist
    }

    pub fn get_albums_list_state(&mut self) -> &mut ListState {
        if self.albums_list_state.selected().is_none() && !self.artist.albums().is_empty() {
            self.albums_list_state.select(Some(0));
        }
        &mut self.albums_list_state
    }

    pub fn next_album(&mut self) -> &mut Self {
        next_index(&mut self.albums_list_state, self.artist.albums().len());
        self
    }

    pub fn previous_album(&mut self) -> &mut Self {
        previous_index(&mut self.albums_list_state, self.artist.albums().len());
        self
    }

    pub fn selected_album(&self) -> Option<&Album> {
        let albums = self.artist.albums();
        if albums.is_empty() {
            return None;
        }
        albums.get(self.albums_list_state.selected().unwrap_or(0))
    }

    /// Save the selected album, or remove it if it is already saved.
    ///
    pub fn toggle_selected_album_saved(&mut self) -> &mut Self {
        let album_id = match self.selected_album() {
            Some(album) => album.id.clone(),
            None => return self,
        };
        if !self.artist.begin_toggle(&album_id) {
            debug!("Save already in progress; ignoring toggle.");
            return self;
        }
        let save = !self.artist.is_saved(&album_id);
        self.dispatch(NetworkEvent::ToggleSaved { album_id, save });
        self
    }

    // Saved albums

    pub fn saved(&self) -> &SavedAlbumsState {
        &self.saved
    }

    pub fn saved_mut(&mut self) -> &mut SavedAlbumsState {
        &mut self.saved
    }

    fn ensure_saved_loaded(&mut self) {
        if self.saved.needs_load() {
            let request = self.saved.begin_load();
            self.saved_list_state.select(None);
            self.dispatch(NetworkEvent::SavedAlbums(request));
        }
    }

    pub fn refresh_saved_albums(&mut self) -> &mut Self {
        if !self.saved.is_loading() {
            let request = self.saved.begin_load();
            self.saved_list_state.select(None);
            self.dispatch(NetworkEvent::SavedAlbums(request));
        }
        self
    }

    pub fn load_more_saved_albums(&mut self) -> &mut Self {
        if let Some(request) = self.saved.load_more() {
            self.dispatch(NetworkEvent::SavedAlbums(request));
        }
        self
    }

    /// Apply a fetched library page.
    ///
    pub fn set_saved_page(&mut self, request: PageRequest, items: Vec<SavedAlbum>) -> &mut Self {
        if request.offset == 0 {
            self.saved_list_state.select(None);
        }
        self.saved.apply_page(request, items);
        self
    }

    /// Albums in display order, which follows the artist grouping.
    ///
    pub fn saved_albums_in_display_order(&mut self) -> Vec<SavedAlbum> {
        self.saved
            .grouped_by_artist()
            .iter()
            .flat_map(|group| group.albums.iter().cloned())
            .collect()
    }

    pub fn get_saved_list_state(&mut self) -> &mut ListState {
        if self.saved_list_state.selected().is_none() && !self.saved.items().is_empty() {
            self.saved_list_state.select(Some(0));
        }
        &mut self.saved_list_state
    }

    /// Move down the library, fetching the next page at the end.
    ///
    pub fn next_saved_album(&mut self) -> &mut Self {
        let len = self.saved.items().len();
        let at_end = len > 0 && self.saved_list_state.selected() == Some(len - 1);
        if at_end {
            return self.load_more_saved_albums();
        }
        next_index(&mut self.saved_list_state, len);
        self
    }

    pub fn previous_saved_album(&mut self) -> &mut Self {
        previous_index(&mut self.saved_list_state, self.saved.items().len());
        self
    }

    pub fn selected_saved_album(&mut self) -> Option<SavedAlbum> {
        let index = self.saved_list_state.selected().unwrap_or(0);
        self.saved_albums_in_display_order().into_iter().nth(index)
    }

    pub fn remove_selected_saved_album(&mut self) -> &mut Self {
        if let Some(saved) = self.selected_saved_album() {
            info!("Removing '{}' from library...", saved.album.name);
            self.dispatch(NetworkEvent::RemoveSaved {
                album_id: saved.album.id,
            });
        }
        self
    }

    /// Apply a confirmed removal and keep the selection in range.
    ///
    pub fn set_saved_album_removed(&mut self, album_id: &str) -> &mut Self {
        self.saved.apply_removed(album_id);
        let len = self.saved.items().len();
        match self.saved_list_state.selected() {
            Some(_) if len == 0 => self.saved_list_state.select(None),
            Some(index) if index >= len => self.saved_list_state.select(Some(len - 1)),
            _ => {}
        }
        if self.artist.is_saved(album_id) {
            self.artist.apply_saved(album_id, false);
        }
        self
    }

    // Clipboard

    /// Copy the Spotify link of the selected artist or album.
    ///
    pub fn copy_selected_link(&mut self) -> &mut Self {
        let view = *self.current_view();
        let url = match view {
            View::Search => self.selected_search_result().and_then(|a| a.url.clone()),
            View::Artist => self
                .selected_album()
                .map(|a| a.url.clone().unwrap_or_else(|| links::album_url(&a.id))),
            View::SavedAlbums => self
                .selected_saved_album()
                .map(|s| s.album.url.unwrap_or_else(|| links::album_url(&s.album.id))),
            View::Welcome => None,
        };
        let url = match url {
            Some(url) => url,
            None => return self,
        };
        let result = ClipboardContext::new()
            .and_then(|mut ctx| ctx.set_contents(url.clone()))
            .map_err(|e| StateError::Clipboard(e.to_string()));
        match result {
            Ok(()) => {
                info!("Copied {} to clipboard.", url);
                self.status_message = Some(format!("Copied {}", url));
            }
            Err(e) => {
                warn!("{}", e);
                self.status_message = Some("Could not copy link.".to_string());
            }
        }
        self
    }

    // Log panel

    pub fn add_log_entry(&mut self, entry: String) -> &mut Self {
        self.log_entries.push(entry);
        if self.log_entries.len() > MAX_LOG_ENTRIES {
            let excess = self.log_entries.len() - MAX_LOG_ENTRIES;
            self.log_entries.drain(..excess);
        }
        self
    }

    pub fn get_log_entries(&self) -> &[String] {
        &self.log_entries
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.show_log = !self.show_log;
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.show_log
    }

    // Session

    pub fn has_access_token(&self) -> bool {
        self.has_access_token
    }

    pub fn get_access_token_input(&self) -> &str {
        &self.access_token_input
    }

    pub fn add_access_token_char(&mut self, c: char) -> &mut Self {
        self.auth_error = None;
        self.access_token_input.push(c);
        self
    }

    pub fn remove_access_token_char(&mut self) -> &mut Self {
        self.access_token_input.pop();
        self
    }

    pub fn get_auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Store the entered token and verify it by loading the user.
    ///
    pub fn submit_access_token(&mut self) -> &mut Self {
        let token = self.access_token_input.trim().to_owned();
        if token.is_empty() {
            self.auth_error = Some("Please enter an access token.".to_string());
            return self;
        }
        self.access_token_input.clear();
        self.token.set(token.clone());
        self.has_access_token = true;
        self.auth_error = None;
        self.save_config(ConfigUpdate::AccessToken(Some(token)));
        self.dispatch(NetworkEvent::Me);
        self
    }

    /// Keep the token after a sign-in failure that was not about the token,
    /// so the user can retry.
    ///
    pub fn fail_sign_in(&mut self, message: &str) -> &mut Self {
        warn!("Sign-in failed; token kept for retry.");
        self.auth_error = Some(message.to_owned());
        self
    }

    pub fn is_sign_in_failed(&self) -> bool {
        self.has_access_token && self.user.is_none() && self.auth_error.is_some()
    }

    /// Verify the stored token again after a failed sign-in.
    ///
    pub fn retry_sign_in(&mut self) -> &mut Self {
        if self.is_sign_in_failed() {
            self.auth_error = None;
            self.dispatch(NetworkEvent::Me);
        }
        self
    }

    /// Return to the welcome screen after Spotify rejected the token.
    ///
    pub fn expire_session(&mut self, message: &str) -> &mut Self {
        warn!("Session expired; returning to welcome screen.");
        self.user = None;
        self.has_access_token = false;
        self.auth_error = Some(message.to_owned());
        self.view_stack = vec![View::Welcome];
        self.search.cancel();
        self.saved = SavedAlbumsState::new(self.saved.page_size());
        self.saved_list_state.select(None);
        self
    }
}

fn next_index(list_state: &mut ListState, len: usize) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let next = match list_state.selected() {
        Some(index) if index + 1 < len => index + 1,
        Some(index) => index,
        None => 0,
    };
    list_state.select(Some(next));
}

fn previous_index(list_state: &mut ListState, len: usize) {
    if len == 0 {
        list_state.select(None);
        return;
    }
    let previous = match list_state.selected() {
        Some(index) => index.saturating_sub(1),
        None => 0,
    };
    list_state.select(Some(previous));
}
