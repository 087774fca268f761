//! Debounced artist search state.
//!
//! Query edits go through a [`Debounce`] timer, and every issued request
//! carries a generation number. Only responses for the latest generation may
//! update the state, so a superseded in-flight search can never overwrite
//! newer results.

use super::debounce::Debounce;
use crate::spotify::{Artist, Page, SpotifyError};
use log::*;
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Observable phase of the search.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Loading,
    Settled,
    Errored,
}

/// A search the network worker should run.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
    pub page: u32,
    pub limit: u32,
    pub offset: u32,
}

/// Houses the query, results and pagination of the artist search.
///
#[derive(Debug)]
pub struct SearchState {
    query: String,
    results: Vec<Artist>,
    loading: bool,
    error: Option<String>,
    has_searched: bool,
    current_page: u32, // 1-based
    total_pages: u32,
    total_results: u32,
    page_size: u32,
    generation: u64,
    debounce: Debounce<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE)
    }
}

impl SearchState {
    pub fn new(debounce: Duration, page_size: u32) -> Self {
        SearchState {
            query: String::new(),
            results: vec![],
            loading: false,
            error: None,
            has_searched: false,
            current_page: 1,
            total_pages: 0,
            total_results: 0,
            page_size: page_size.max(1),
            generation: 0,
            debounce: Debounce::new(debounce),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Artist] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn phase(&self) -> SearchPhase {
        if self.debounce.is_pending() {
            SearchPhase::Debouncing
        } else if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Errored
        } else if self.has_searched {
            SearchPhase::Settled
        } else {
            SearchPhase::Idle
        }
    }

    /// Replace the query. Non-blank text restarts the debounce timer and
    /// invalidates any request in flight; blank text resets the search
    /// immediately without any request.
    ///
    pub fn set_query(&mut self, text: &str, now: Instant) {
        self.query = text.to_owned();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.reset();
        } else {
            self.invalidate();
            self.debounce.schedule(trimmed.to_owned(), now);
        }
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = self.query.clone();
        text.push(c);
        self.set_query(&text, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut text = self.query.clone();
        text.pop();
        self.set_query(&text, now);
    }

    /// Return the request to issue once the debounce timer has fired.
    ///
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let query = self.debounce.poll(now)?;
        Some(self.begin(query, 1))
    }

    /// Re-issue the last query at the current page, bypassing the debounce.
    ///
    pub fn retry(&mut self) -> Option<SearchRequest> {
        let query = self.query.trim().to_owned();
        if query.is_empty() {
            return None;
        }
        self.debounce.cancel();
        let page = self.current_page;
        Some(self.begin(query, page))
    }

    pub fn next_page(&mut self) -> Option<SearchRequest> {
        if !self.has_searched || self.current_page >= self.total_pages {
            return None;
        }
        self.goto_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> Option<SearchRequest> {
        if !self.has_searched || self.current_page <= 1 {
            return None;
        }
        self.goto_page(self.current_page - 1)
    }

    fn goto_page(&mut self, page: u32) -> Option<SearchRequest> {
        let query = self.query.trim().to_owned();
        if query.is_empty() {
            return None;
        }
        self.debounce.cancel();
        Some(self.begin(query, page))
    }

    fn begin(&mut self, query: String, page: u32) -> SearchRequest {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.current_page = page;
        debug!(
            "Starting search #{} for '{}' (page {})",
            self.generation, query, page
        );
        SearchRequest {
            generation: self.generation,
            query,
            page,
            limit: self.page_size,
            offset: (page - 1) * self.page_size,
        }
    }

    /// Cancel the pending debounce and invalidate any request in flight.
    ///
    pub fn cancel(&mut self) {
        self.debounce.cancel();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    fn reset(&mut self) {
        self.cancel();
        self.results.clear();
        self.error = None;
        self.has_searched = false;
        self.current_page = 1;
        self.total_pages = 0;
        self.total_results = 0;
    }

    fn is_current(&self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale search response #{} (current #{})",
                generation, self.generation
            );
            return false;
        }
        true
    }

    /// Store a page of results. Returns false if the response was stale.
    ///
    pub fn apply_results(&mut self, generation: u64, page: Page<Artist>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.total_pages = page.total_pages();
        self.total_results = page.total;
        self.results = page.items;
        self.has_searched = true;
        self.loading = false;
        self.error = None;
        true
    }

    /// Store the user-facing message for a failed search. Returns false if the
    /// response was stale.
    ///
    pub fn apply_error(&mut self, generation: u64, error: &SpotifyError) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.error = Some(error.user_message().to_string());
        self.results.clear();
        self.has_searched = true;
        self.loading = false;
        true
    }
}
