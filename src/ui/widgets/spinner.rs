use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{layout::Alignment, text::Line, widgets::Paragraph};

/// Frames of the loading animation, advanced on every tick.
///
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Return the current frame.
///
pub fn frame(state: &State) -> &'static str {
    FRAMES[state.get_spinner_index() % FRAMES.len()]
}

/// Return a centered spinner with a label, padded to sit mid-height.
///
pub fn widget(state: &State, label: &str, height: u16) -> Paragraph<'static> {
    let mut lines: Vec<Line> = (0..height.saturating_sub(2) / 2).map(|_| Line::from("")).collect();
    lines.push(Line::from(format!("{} {}", frame(state), label)));
    Paragraph::new(lines)
        .style(styling::muted_text_style(state.get_theme()))
        .alignment(Alignment::Center)
}
