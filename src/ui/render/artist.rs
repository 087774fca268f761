use super::search::format_count;
use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Render the opened artist with their discography.
///
pub fn artist(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let artist_state = state.artist();

    let details = match artist_state.artist() {
        Some(artist) => artist,
        None => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(&theme))
                .title(" Artist ");
            if let Some(error) = artist_state.error() {
                let message = Paragraph::new(Span::styled(
                    error.to_string(),
                    styling::error_text_style(&theme),
                ))
                .block(block);
                frame.render_widget(message, size);
            } else {
                frame.render_widget(
                    spinner::widget(state, "Loading artist...", size.height).block(block),
                    size,
                );
            }
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(size);

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} followers", format_count(details.followers)),
            styling::normal_text_style(&theme),
        ),
        Span::styled(
            format!("  ·  popularity {}/100", details.popularity),
            styling::muted_text_style(&theme),
        ),
    ])];
    if !details.genres.is_empty() {
        lines.push(Line::from(Span::styled(
            details.genres.join(", "),
            styling::muted_text_style(&theme),
        )));
    }
    if let Some(error) = artist_state.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            styling::error_text_style(&theme),
        )));
    }
    let header = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::active_block_border_style(&theme))
            .title(Span::styled(
                format!(" {} ", details.name),
                styling::active_block_title_style(),
            )),
    );
    frame.render_widget(header, rows[0]);

    let items: Vec<ListItem> = artist_state
        .albums()
        .iter()
        .map(|album| {
            let marker = if artist_state.is_pending(&album.id) {
                Span::styled(format!("{} ", spinner::frame(state)), styling::muted_text_style(&theme))
            } else if artist_state.is_saved(&album.id) {
                Span::styled("✓ ", styling::saved_marker_style(&theme))
            } else {
                Span::raw("  ")
            };
            ListItem::new(Line::from(vec![
                marker,
                Span::styled(album.name.clone(), styling::normal_text_style(&theme)),
                Span::styled(
                    format!(
                        "  {} · {} · {} tracks",
                        album.release_year().unwrap_or("----"),
                        album.album_type,
                        album.total_tracks
                    ),
                    styling::muted_text_style(&theme),
                ),
            ]))
        })
        .collect();
    let title = format!(" Albums ({}) ", artist_state.albums().len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styling::normal_block_border_style(&theme))
                .title(title),
        )
        .highlight_style(styling::active_list_item_style(&theme))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, rows[1], state.get_albums_list_state());
}
