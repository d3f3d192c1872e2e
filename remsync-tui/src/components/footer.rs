use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::Paragraph,
};
use remsync_core::AppState;

pub fn hints(state: &AppState) -> &'static str {
    if state.has_two_remotes() {
        "[f]etch [s]ync [b]ranches [q]uit [?]help"
    } else {
        "[a]dd remote [q]uit [?]help"
    }
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let line = Span::styled(format!(" {}", hints(state)), Style::default().fg(theme.hint));
    f.render_widget(Paragraph::new(line), area);
}
