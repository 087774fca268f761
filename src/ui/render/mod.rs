mod artist;
mod footer;
mod header;
mod log;
mod saved;
mod search;
mod welcome;

use self::log::log;
use super::*;
use crate::state::{State, View};
use artist::artist;
use footer::footer;
use header::header;
use ratatui::layout::{Constraint, Direction, Layout};
use saved::saved;
use search::search;
use welcome::welcome;

/// Height of the log panel when it is shown.
///
const LOG_HEIGHT: u16 = 10;

/// Render the whole screen according to state.
///
pub fn render(frame: &mut Frame, state: &mut State) {
    let size = frame.size();
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
    if state.is_log_visible() {
        constraints.push(Constraint::Length(LOG_HEIGHT));
    }
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let view = *state.current_view();
    if view == View::Welcome {
        // The welcome screen takes the header space too
        let body = rows[0].union(rows[1]);
        welcome(frame, body, state);
    } else {
        header(frame, rows[0], state);
        match view {
            View::Search => search(frame, rows[1], state),
            View::Artist => artist(frame, rows[1], state),
            View::SavedAlbums => saved(frame, rows[1], state),
            View::Welcome => {}
        }
    }
    if state.is_log_visible() {
        log(frame, rows[2], state);
    }
    footer(frame, rows[rows.len() - 1], state);
}
