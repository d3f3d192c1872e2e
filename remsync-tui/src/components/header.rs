use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use remsync_core::AppState;

/// Status text shown after the branch name, with the color to draw it in
pub fn status_text(state: &AppState, theme: &Theme, spinner: &str) -> (String, Color) {
    let Some((a, b)) = state.remote_names() else {
        return (
            "Only one remote found. Press 'a' to add a second remote.".to_string(),
            theme.warning,
        );
    };

    if state.loading {
        return (format!("{spinner} Fetching from remotes..."), theme.secondary);
    }

    match &state.comparison {
        Some(result) => (result.describe(a, b), theme.status_color(result.status)),
        None => (
            "Ready. Press 'f' to fetch from remotes.".to_string(),
            theme.muted,
        ),
    }
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, spinner: &str) {
    let (status, color) = status_text(state, theme, spinner);
    let line = Line::from(vec![
        Span::raw("Branch: "),
        Span::styled(
            state.branch.as_str(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(theme.muted)),
        Span::styled(status, Style::default().fg(color)),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" remsync ")
        .border_style(Style::default().fg(theme.border));
    f.render_widget(Paragraph::new(line).block(block), area);
}
