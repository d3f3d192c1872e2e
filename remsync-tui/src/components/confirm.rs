use super::dialog::Dialog;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use remsync_core::{AppState, Mode};

fn prompt(theme: &Theme) -> Line<'static> {
    Line::styled(
        "Continue? [y/n]",
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
}

fn labelled<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::raw(label),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

/// Confirmation before pushing the ahead remote's commits to the other
pub fn draw_sync(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Mode::ConfirmSync { direction } = &state.mode else {
        return;
    };
    let Some((a, b)) = state.remote_names() else {
        return;
    };
    let (source, destination) = direction.endpoints(a, b);
    let count = state
        .comparison
        .as_ref()
        .map_or(0, |c| direction.commit_count(c));

    let lines = vec![
        labelled("Branch: ", state.branch.clone()),
        labelled("Direction: ", format!("{source} → {destination}")),
        labelled("Commits to sync: ", count.to_string()),
        Line::raw(""),
        prompt(theme),
    ];

    Dialog::new(lines)
        .title("Sync Confirmation")
        .border_color(theme.warning)
        .render(f, area);
}

/// Confirmation before creating the highlighted branch on the remote that lacks it
pub fn draw_create_branch(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Mode::ConfirmBranchCreate { branch, target, .. } = &state.mode else {
        return;
    };

    let lines = vec![
        labelled("Branch: ", branch.clone()),
        labelled("Remote: ", target.clone()),
        Line::raw(""),
        Line::raw(format!(
            "This will create the branch on {target} from the existing branch on the other remote."
        )),
        Line::raw(""),
        prompt(theme),
    ];

    Dialog::new(lines)
        .title("Create Branch")
        .border_color(theme.success)
        .render(f, area);
}
