use super::dialog::Dialog;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use remsync_core::{AppState, RemoteBranch, SyncStatus};

fn availability_line<'a>(remote: &'a str, present: bool, theme: &Theme) -> Line<'a> {
    let (text, color) = if present {
        ("✓ Available", theme.success)
    } else {
        ("✗ Not found", theme.error)
    };
    Line::from(vec![
        Span::raw(format!("  {remote}: ")),
        Span::styled(text, Style::default().fg(color)),
    ])
}

/// Sync status lines for the highlighted branch
fn status_lines(state: &AppState, branch: &RemoteBranch, theme: &Theme) -> Vec<(String, Color)> {
    if branch.on_exactly_one() {
        return vec![
            ("Branch only exists on one remote".to_string(), theme.warning),
            (
                "Press 'c' to create on the other remote".to_string(),
                theme.hint,
            ),
        ];
    }
    if !branch.on_both() {
        return vec![("Branch doesn't exist on either remote".to_string(), theme.error)];
    }

    let comparison = state
        .comparison
        .as_ref()
        .filter(|c| c.branch == branch.name && branch.name == state.branch);
    let (a, b) = state.remote_names().unwrap_or_default();
    let line = match comparison.map(|c| (c.status, c.ahead_a, c.ahead_b)) {
        Some((SyncStatus::InSync, _, _)) => ("In sync ✓".to_string(), theme.success),
        Some((SyncStatus::AheadA, n, _)) => (format!("{a} ahead by {n} commits"), theme.ahead),
        Some((SyncStatus::AheadB, _, n)) => (format!("{b} ahead by {n} commits"), theme.ahead),
        Some((SyncStatus::Diverged, _, _)) => {
            ("Diverged (manual merge required)".to_string(), theme.warning)
        }
        Some((SyncStatus::BranchMissing, _, _)) | None => (
            "Switch to this branch to see sync status".to_string(),
            theme.muted,
        ),
    };
    vec![line]
}

pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(branch) = state.selected_branch() else {
        return;
    };
    let (a, b) = state.remote_names().unwrap_or_default();

    let mut lines = vec![
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(
                branch.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::raw(""),
        Line::raw("Availability:"),
        availability_line(a, branch.on_a, theme),
        availability_line(b, branch.on_b, theme),
        Line::raw(""),
    ];
    lines.extend(
        status_lines(state, branch, theme)
            .into_iter()
            .map(|(text, color)| Line::styled(text, Style::default().fg(color))),
    );
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    ));

    Dialog::new(lines)
        .title("Branch Information")
        .border_color(theme.secondary)
        .render(f, area);
}
