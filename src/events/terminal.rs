use crate::state::{State, View};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            loop {
                match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) => {
                            if tx_clone.send(Event::Input(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => error!("Failed to read terminal event: {}", e),
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!("Failed to poll terminal events: {}", e);
                        break;
                    }
                }
                if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => Ok(handle_key(state, key, Instant::now())),
            Event::Tick => {
                state.on_tick(Instant::now());
                Ok(true)
            }
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

/// Apply a key press to the state. Returns false if exit was requested.
///
pub fn handle_key(state: &mut State, key: KeyEvent, now: Instant) -> bool {
    if key.kind != KeyEventKind::Press {
        return true;
    }
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        KeyEvent {
            code: KeyCode::F(2),
            ..
        } => {
            state.toggle_log();
            return true;
        }
        _ => {}
    }

    match *state.current_view() {
        View::Welcome => {
            handle_welcome_key(state, key);
            true
        }
        View::Search => handle_search_key(state, key, now),
        View::Artist => handle_artist_key(state, key),
        View::SavedAlbums => handle_saved_key(state, key),
    }
}

fn is_text(modifiers: KeyModifiers) -> bool {
    modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT
}

/// Token entry. While a submitted token is being verified only a failed
/// sign-in can be retried.
///
fn handle_welcome_key(state: &mut State, key: KeyEvent) {
    if state.has_access_token() {
        if key.code == KeyCode::Enter {
            state.retry_sign_in();
        }
        return;
    }
    match key.code {
        KeyCode::Char(c) if is_text(key.modifiers) => {
            state.add_access_token_char(c);
        }
        KeyCode::Backspace => {
            state.remove_access_token_char();
        }
        KeyCode::Enter => {
            debug!("Submitting access token...");
            state.submit_access_token();
        }
        _ => {}
    }
}

/// Every printable key edits the query, so commands here use Ctrl or
/// non-character keys.
///
fn handle_search_key(state: &mut State, key: KeyEvent, now: Instant) -> bool {
    match key {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers,
            ..
        } if is_text(modifiers) => {
            state.add_search_char(c, now);
        }
        KeyEvent {
            code: KeyCode::Char('r'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => {
            state.retry_search();
        }
        KeyEvent {
            code: KeyCode::Char('u'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => {
            state.clear_search(now);
        }
        KeyEvent {
            code: KeyCode::Char('y'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => {
            state.copy_selected_link();
        }
        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => {
            state.remove_search_char(now);
        }
        KeyEvent {
            code: KeyCode::Esc, ..
        } => {
            state.clear_search(now);
        }
        KeyEvent {
            code: KeyCode::Down,
            ..
        } => {
            state.next_search_result();
        }
        KeyEvent { code: KeyCode::Up, .. } => {
            state.previous_search_result();
        }
        KeyEvent {
            code: KeyCode::PageDown,
            ..
        } => {
            state.next_search_page();
        }
        KeyEvent {
            code: KeyCode::PageUp,
            ..
        } => {
            state.previous_search_page();
        }
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => {
            state.open_selected_artist();
        }
        KeyEvent {
            code: KeyCode::Tab, ..
        } => {
            state.switch_section();
        }
        _ => {}
    }
    true
}

fn handle_artist_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
            state.pop_view();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.next_album();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous_album();
        }
        KeyCode::Enter | KeyCode::Char('s') => {
            state.toggle_selected_album_saved();
        }
        KeyCode::Char('y') => {
            state.copy_selected_link();
        }
        KeyCode::Tab => {
            state.switch_section();
        }
        _ => {}
    }
    true
}

fn handle_saved_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc => {
            state.pop_view();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.next_saved_album();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.previous_saved_album();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            state.remove_selected_saved_album();
        }
        KeyCode::Char('m') => {
            state.load_more_saved_albums();
        }
        KeyCode::Char('r') => {
            state.refresh_saved_albums();
        }
        KeyCode::Char('y') => {
            state.copy_selected_link();
        }
        KeyCode::Tab => {
            state.switch_section();
        }
        _ => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::User;
    use fake::{Fake, Faker};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn signed_in() -> State {
        let mut state = State::default();
        let user: User = Faker.fake();
        state.set_user(user);
        state
    }

    #[test]
    fn ctrl_c_exits_from_any_view() {
        let mut state = State::default();
        assert!(!handle_key(&mut state, ctrl('c'), Instant::now()));
        let mut state = signed_in();
        assert!(!handle_key(&mut state, ctrl('c'), Instant::now()));
    }

    #[test]
    fn typing_q_in_search_edits_query() {
        let mut state = signed_in();
        let now = Instant::now();
        assert!(handle_key(&mut state, press(KeyCode::Char('q')), now));
        assert!(handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('U'), KeyModifiers::SHIFT),
            now
        ));
        assert_eq!(state.search().query(), "qU");
        handle_key(&mut state, press(KeyCode::Backspace), now);
        assert_eq!(state.search().query(), "q");
        handle_key(&mut state, ctrl('u'), now);
        assert_eq!(state.search().query(), "");
    }

    #[test]
    fn key_release_is_ignored() {
        let mut state = signed_in();
        let mut key = press(KeyCode::Char('a'));
        key.kind = KeyEventKind::Release;
        assert!(handle_key(&mut state, key, Instant::now()));
        assert_eq!(state.search().query(), "");
    }

    #[test]
    fn welcome_collects_token() {
        let mut state = State::default();
        let now = Instant::now();
        for c in "BQD".chars() {
            handle_key(&mut state, press(KeyCode::Char(c)), now);
        }
        handle_key(&mut state, press(KeyCode::Backspace), now);
        assert_eq!(state.get_access_token_input(), "BQ");
        handle_key(&mut state, press(KeyCode::Enter), now);
        assert!(state.has_access_token());
        assert_eq!(state.get_access_token_input(), "");
    }

    #[test]
    fn enter_retries_failed_sign_in() {
        let mut state = State::default();
        let now = Instant::now();
        handle_key(&mut state, press(KeyCode::Char('t')), now);
        handle_key(&mut state, press(KeyCode::Enter), now);
        state.fail_sign_in("The service is temporarily unavailable.");

        handle_key(&mut state, press(KeyCode::Char('x')), now);
        assert_eq!(state.get_access_token_input(), "");
        handle_key(&mut state, press(KeyCode::Enter), now);
        assert!(state.has_access_token());
        assert!(!state.is_sign_in_failed());
    }

    #[test]
    fn tab_switches_sections_and_q_quits_library() {
        let mut state = signed_in();
        let now = Instant::now();
        handle_key(&mut state, press(KeyCode::Tab), now);
        assert_eq!(state.current_view(), &View::SavedAlbums);
        assert!(state.saved().is_loading());
        assert!(!handle_key(&mut state, press(KeyCode::Char('q')), now));
        handle_key(&mut state, press(KeyCode::Tab), now);
        assert_eq!(state.current_view(), &View::Search);
    }

    #[test]
    fn escape_leaves_artist_page() {
        let mut state = signed_in();
        state.open_artist("0OdUWJ0sBjDrqHygGUXeCF");
        assert_eq!(state.current_view(), &View::Artist);
        handle_key(&mut state, press(KeyCode::Esc), Instant::now());
        assert_eq!(state.current_view(), &View::Search);
    }

    #[test]
    fn f2_toggles_log_panel() {
        let mut state = signed_in();
        handle_key(&mut state, press(KeyCode::F(2)), Instant::now());
        assert!(state.is_log_visible());
    }
}
