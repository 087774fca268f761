use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const BANNER: &str = r"
                  _   _  __
 ___ _ __   ___ | |_(_)/ _|_   _
/ __| '_ \ / _ \| __| | |_| | | |
\__ \ |_) | (_) | |_| |  _| |_| |
|___/ .__/ \___/ \__|_|_|  \__, |
    |_|                    |___/
";

pub const INSTRUCTIONS: &str = "To get started you need a Spotify access token with the
user-library-read and user-library-modify scopes.

1. Visit https://developer.spotify.com/documentation/web-api
2. Create an app or use an existing one to obtain a user token
3. Paste the token below and press Enter";

/// Render the sign-in screen.
///
pub fn welcome(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Welcome ", styling::active_block_title_style()))
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(size);

    let banner = Text::from(BANNER).patch_style(styling::banner_style(theme));
    frame.render_widget(Paragraph::new(banner).alignment(Alignment::Center), chunks[0]);

    if state.is_sign_in_failed() {
        let error = state.get_auth_error().unwrap_or_default().to_string();
        let lines = vec![
            Line::from(Span::styled(error, styling::error_text_style(theme))),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to retry.",
                styling::muted_text_style(theme),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            chunks[1],
        );
        return;
    }

    if state.has_access_token() {
        frame.render_widget(
            spinner::widget(state, "Signing in...", chunks[1].height),
            chunks[1],
        );
        return;
    }

    let mut lines: Vec<Line> = INSTRUCTIONS.lines().map(Line::from).collect();
    if let Some(error) = state.get_auth_error() {
        lines.insert(
            0,
            Line::from(Span::styled(error.to_string(), styling::error_text_style(theme))),
        );
        lines.insert(1, Line::from(""));
    }
    let instructions = Paragraph::new(lines)
        .style(styling::normal_text_style(theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(instructions, chunks[1]);

    let token_input = state.get_access_token_input();
    let (input_text, input_style) = if token_input.is_empty() {
        ("Paste token here...".to_string(), styling::muted_text_style(theme))
    } else {
        (
            "*".repeat(token_input.chars().count().min(60)),
            styling::normal_text_style(theme),
        )
    };
    let input_border = if state.get_auth_error().is_some() {
        styling::error_text_style(theme)
    } else {
        styling::active_block_border_style(theme)
    };
    let input = Paragraph::new(input_text).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Access Token (Enter to submit) ")
            .border_style(input_border),
    );
    frame.render_widget(input, chunks[2]);
}
