use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
};
use remsync_core::AppState;

fn is_failure(message: &str) -> bool {
    message.to_lowercase().contains("failed")
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    if let Some(message) = &state.message {
        let style = if is_failure(message) {
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.secondary)
        };
        f.render_widget(Paragraph::new(Span::styled(format!(" {message}"), style)), area);
    }
}
