use super::dialog::Dialog;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("↑/k", "Move up in the focused pane"),
            ("↓/j", "Move down in the focused pane"),
            ("Tab", "Switch focus between panes"),
        ],
    ),
    (
        "Actions",
        &[
            ("a", "Add a second remote"),
            ("b", "Open the branch selector"),
            ("f", "Fetch both remotes and compare"),
            ("s", "Sync the ahead remote to the other"),
        ],
    ),
    (
        "Branch Management",
        &[
            ("c", "Create the branch on the remote missing it"),
            ("i", "Show branch information"),
            ("/", "Search branches"),
            ("r", "Reload the branch list"),
        ],
    ),
    (
        "Other",
        &[("?", "Toggle this help"), ("q/Ctrl+C", "Quit")],
    ),
];

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (title, rows) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(
            format!("{title}:"),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
        for (key, description) in *rows {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {key:<10}"),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(*description),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press ? or Esc to close this help.",
        Style::default().fg(theme.muted),
    ));
    lines
}

/// Help overlay listing the key bindings
pub fn draw(f: &mut Frame, area: Rect, theme: &Theme) {
    Dialog::new(help_lines(theme))
        .title("Help")
        .border_color(theme.accent)
        .render(f, area);
}
