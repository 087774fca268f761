use super::Frame;
use crate::state::{SearchPhase, State};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const HINT: &str = "Type an artist name or paste an open.spotify.com artist link.";

/// Render the query box, the results and the pagination line.
///
pub fn search(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let phase = state.search().phase();
    let indicator = match phase {
        SearchPhase::Debouncing => "…".to_string(),
        SearchPhase::Loading => spinner::frame(state).to_string(),
        _ => String::new(),
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled(state.search().query().to_string(), styling::normal_text_style(&theme)),
        Span::styled("▏", styling::active_list_item_style(&theme)),
        Span::raw(" "),
        Span::styled(indicator, styling::muted_text_style(&theme)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(styling::active_block_border_style(&theme))
            .title(Span::styled(" Search Artists ", styling::active_block_title_style())),
    );
    frame.render_widget(input, rows[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(&theme))
        .title(" Results ");

    if phase == SearchPhase::Loading && state.search().results().is_empty() {
        frame.render_widget(
            spinner::widget(state, "Searching...", rows[1].height).block(block),
            rows[1],
        );
    } else if let Some(error) = state.search().error() {
        let message = Paragraph::new(vec![
            Line::from(Span::styled(error.to_string(), styling::error_text_style(&theme))),
            Line::from(Span::styled(
                "Press Ctrl+R to retry.",
                styling::muted_text_style(&theme),
            )),
        ])
        .block(block);
        frame.render_widget(message, rows[1]);
    } else if state.search().has_searched() && state.search().results().is_empty() {
        let message = Paragraph::new(Span::styled(
            format!("No artists found for '{}'.", state.search().query().trim()),
            styling::muted_text_style(&theme),
        ))
        .block(block);
        frame.render_widget(message, rows[1]);
    } else if !state.search().has_searched() {
        let message =
            Paragraph::new(Span::styled(HINT, styling::muted_text_style(&theme))).block(block);
        frame.render_widget(message, rows[1]);
    } else {
        let items: Vec<ListItem> = state
            .search()
            .results()
            .iter()
            .map(|artist| {
                let mut spans = vec![
                    Span::styled(artist.name.clone(), styling::normal_text_style(&theme)),
                    Span::styled(
                        format!("  {} followers", format_count(artist.followers)),
                        styling::muted_text_style(&theme),
                    ),
                ];
                if !artist.genres.is_empty() {
                    spans.push(Span::styled(
                        format!("  · {}", artist.genres.join(", ")),
                        styling::muted_text_style(&theme),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(styling::active_list_item_style(&theme))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, rows[1], state.get_search_list_state());
    }

    let search_state = state.search();
    let status = if search_state.has_searched() && search_state.total_pages() > 0 {
        format!(
            " Page {} of {} ({} artists)",
            search_state.current_page(),
            search_state.total_pages(),
            search_state.total_results()
        )
    } else {
        String::new()
    };
    frame.render_widget(
        Paragraph::new(Span::styled(status, styling::muted_text_style(&theme))),
        rows[2],
    );
}

/// Abbreviate large counts, e.g. 1234567 as 1.2M.
///
pub fn format_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format!("{:.1}K", count as f64 / 1_000.0),
        _ => format!("{:.1}M", count as f64 / 1_000_000.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_500), "1.5K");
        assert_eq!(format_count(2_345_678), "2.3M");
    }
}
