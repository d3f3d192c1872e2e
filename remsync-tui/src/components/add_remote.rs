use super::dialog::Dialog;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use remsync_core::{
    AppState,
    state::{FormField, TextInput},
};

fn field_line<'a>(
    label: &'a str,
    input: &'a TextInput,
    placeholder: &'a str,
    focused: bool,
    theme: &Theme,
) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value = if input.is_empty() {
        Span::styled(placeholder, Style::default().fg(theme.muted))
    } else if focused {
        Span::raw(format!("{}_", input.text))
    } else {
        Span::raw(input.text.as_str())
    };
    Line::from(vec![
        Span::styled(format!("{marker}{label}"), label_style),
        value,
    ])
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.add_remote;
    let hint = Style::default().fg(theme.hint);
    let lines = vec![
        field_line(
            "Name:  ",
            &form.name,
            "(enter name)",
            form.field == FormField::Name,
            theme,
        ),
        field_line(
            "URL:   ",
            &form.url,
            "(enter URL)",
            form.field == FormField::Url,
            theme,
        ),
        Line::raw(""),
        Line::styled("Press Tab to switch fields", hint),
        Line::styled("Press Enter to submit", hint),
        Line::styled("Press Esc to cancel", hint),
    ];

    Dialog::new(lines)
        .title("Add Remote")
        .border_color(theme.accent)
        .render(f, area);
}
