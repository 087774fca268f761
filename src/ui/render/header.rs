use super::Frame;
use crate::state::{State, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};

const SECTIONS: [View; 2] = [View::Search, View::SavedAlbums];

/// Render section tabs with the signed-in user in the title.
///
pub fn header(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let section = state.root_view();
    let selected = SECTIONS.iter().position(|view| *view == section).unwrap_or(0);
    let title = match state.get_user() {
        Some(user) => format!(" Spotify Albums - {} ", user.name()),
        None => " Spotify Albums ".to_string(),
    };
    let titles: Vec<Line> = SECTIONS
        .iter()
        .map(|view| Line::from(Span::raw(view.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(theme))
                .title(Span::styled(title, styling::active_block_title_style())),
        );
    frame.render_widget(tabs, size);
}
