use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Render the library grouped by artist. Group headings are extra rows, so
/// the selected album is mapped onto its row before rendering.
///
pub fn saved(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    let selected = state.get_saved_list_state().selected();
    let total = state.saved().items().len();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme))
        .title(Span::styled(
            format!(" Saved Albums ({}) ", total),
            styling::active_block_title_style(),
        ));

    if total == 0 {
        if state.saved().is_loading() {
            frame.render_widget(
                spinner::widget(state, "Loading your library...", rows[0].height).block(block),
                rows[0],
            );
        } else {
            let text = state
                .saved()
                .error()
                .map(|error| Span::styled(error.to_string(), styling::error_text_style(&theme)))
                .unwrap_or_else(|| {
                    Span::styled("Your library is empty.", styling::muted_text_style(&theme))
                });
            frame.render_widget(Paragraph::new(text).block(block), rows[0]);
        }
        return;
    }

    let mut items: Vec<ListItem> = vec![];
    let mut selected_row = None;
    let mut album_index = 0;
    for group in state.saved_mut().grouped_by_artist() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("{} ({})", group.artist, group.albums.len()),
            styling::heading_style(&theme),
        ))));
        for saved in &group.albums {
            if selected == Some(album_index) {
                selected_row = Some(items.len());
            }
            items.push(ListItem::new(Line::from(vec![
                Span::raw("  "),
                Span::styled(saved.album.name.clone(), styling::normal_text_style(&theme)),
                Span::styled(
                    format!("  {}", saved.album.release_year().unwrap_or("----")),
                    styling::muted_text_style(&theme),
                ),
            ])));
            album_index += 1;
        }
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(styling::active_list_item_style(&theme))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(selected_row);
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    let saved_state = state.saved();
    let status = if let Some(error) = saved_state.error() {
        Span::styled(format!(" {}", error), styling::error_text_style(&theme))
    } else if saved_state.is_loading() {
        Span::styled(
            format!(" {} Loading more...", spinner::frame(state)),
            styling::muted_text_style(&theme),
        )
    } else if saved_state.has_more() {
        Span::styled(" More albums available (m)", styling::muted_text_style(&theme))
    } else {
        Span::styled(" All albums loaded", styling::muted_text_style(&theme))
    };
    frame.render_widget(Paragraph::new(status), rows[1]);
}
