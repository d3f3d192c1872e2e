use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use remsync_core::{AppState, Mode, RemoteBranch};

const NAVIGATION_HINT: &str =
    "↑/↓/j/k: Navigate  Enter: Switch  c: Create  i: Info  /: Search  r: Refresh  Esc: Close";

/// `[both]` or the name of the single remote carrying the branch
fn availability_marker(branch: &RemoteBranch, remote_a: &str, remote_b: &str) -> String {
    match (branch.on_a, branch.on_b) {
        (true, true) => " [both]".to_string(),
        (true, false) => format!(" [{remote_a}]"),
        (false, true) => format!(" [{remote_b}]"),
        (false, false) => String::new(),
    }
}

fn hint_lines<'a>(state: &'a AppState, theme: &Theme) -> Vec<Line<'a>> {
    let searching = matches!(state.mode, Mode::BranchSelect { searching: true });
    let query = &state.branch_list.query;
    let hint = Style::default().fg(theme.hint);

    if searching {
        vec![
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(theme.accent)),
                Span::raw(format!("{}_", query.text)),
            ]),
            Line::styled("Press Esc to exit search", hint),
        ]
    } else if !query.is_empty() {
        vec![
            Line::from(vec![
                Span::styled("Filter: ", Style::default().fg(theme.accent)),
                Span::raw(query.text.as_str()),
                Span::styled(" (Press / to search again)", hint),
            ]),
            Line::styled(NAVIGATION_HINT, hint),
        ]
    } else {
        vec![Line::raw(""), Line::styled(NAVIGATION_HINT, hint)]
    }
}

/// Branch selector overlay with its search and key hints
pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let popup_area = super::centered_rect(80, 70, area);
    f.render_widget(Clear, popup_area);

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).split(popup_area);

    let title = if state.loading_branches {
        " Loading branches... "
    } else {
        " Select Branch "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.accent));

    let (remote_a, remote_b) = state.remote_names().unwrap_or_default();

    if state.branch_list.filtered.is_empty() && !state.loading_branches {
        let empty = Paragraph::new(Line::styled(
            "  No branches found",
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = state
            .branch_list
            .filtered
            .iter()
            .filter_map(|(idx, _)| state.branches.get(*idx))
            .map(|branch| {
                let current = branch.name == state.branch;
                let prefix = if current { "* " } else { "  " };
                let name_style = if current {
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{prefix}{}", branch.name), name_style),
                    Span::styled(
                        availability_marker(branch, remote_a, remote_b),
                        Style::default().fg(theme.muted),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(theme.secondary)
                    .fg(theme.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default();
        list_state.select(state.branch_list.selected);
        f.render_stateful_widget(list, chunks[0], &mut list_state);
    }

    f.render_widget(Paragraph::new(hint_lines(state, theme)), chunks[1]);
}
