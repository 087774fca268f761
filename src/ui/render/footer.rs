use super::Frame;
use crate::state::{State, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Return the key hints for a view.
///
fn hints(view: View) -> &'static str {
    match view {
        View::Welcome => " Enter: submit · F2: log · Ctrl+C: quit",
        View::Search => {
            " ↑↓: select · Enter: open · PgUp/PgDn: page · Ctrl+R: retry · Ctrl+Y: copy link · Tab: library · F2: log · Ctrl+C: quit"
        }
        View::Artist => " ↑↓: select · s: save/remove · y: copy link · Esc: back · Tab: switch · q: quit",
        View::SavedAlbums => {
            " ↑↓: select · d: remove · m: more · r: refresh · y: copy link · Tab: search · q: quit"
        }
    }
}

/// Render the status message, or the key hints when there is none.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let line = match state.get_status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {}", message),
            styling::saved_marker_style(theme),
        )),
        None => Line::from(Span::styled(
            hints(*state.current_view()),
            styling::muted_text_style(theme),
        )),
    };
    frame.render_widget(Paragraph::new(line), size);
}
