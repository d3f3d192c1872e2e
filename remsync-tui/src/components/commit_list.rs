use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use remsync_core::{
    AppState, Commit,
    state::Pane,
};

/// The two side-by-side commit panes, or a placeholder for the missing second remote
pub fn draw(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    draw_pane(f, chunks[0], state, theme, Pane::A);
    if state.has_two_remotes() {
        draw_pane(f, chunks[1], state, theme, Pane::B);
    } else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" SECOND REMOTE ")
            .border_style(Style::default().fg(theme.border));
        let hint = Paragraph::new(Line::styled(
            "Press 'a' to add a second remote",
            Style::default().fg(theme.hint),
        ))
        .block(block);
        f.render_widget(hint, chunks[1]);
    }
}

fn pane_remote(state: &AppState, pane: Pane) -> &str {
    match pane {
        Pane::A => state.remote_a.name.as_str(),
        Pane::B => state.remote_b.as_ref().map_or("", |r| r.name.as_str()),
    }
}

/// Commits counted on this side but not listed
fn hidden_count(state: &AppState, pane: Pane) -> usize {
    let Some(result) = state.comparison.as_ref().filter(|r| r.is_truncated()) else {
        return 0;
    };
    let (ahead, listed) = match pane {
        Pane::A => (result.ahead_a, result.unique_a.len()),
        Pane::B => (result.ahead_b, result.unique_b.len()),
    };
    ahead.saturating_sub(listed)
}

fn draw_pane(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme, pane: Pane) {
    let focused = state.focus == pane;
    let border_color = if focused { theme.accent } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" COMMITS ({}) ", pane_remote(state, pane)))
        .border_style(Style::default().fg(border_color));

    let commits = state.pane_commits(pane);
    if commits.is_empty() {
        let placeholder = if state.comparison.is_some() {
            "(no unique commits)"
        } else {
            "(waiting for fetch...)"
        };
        let text = Paragraph::new(Line::styled(
            placeholder,
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        f.render_widget(text, area);
        return;
    }

    let mut items: Vec<ListItem> = commits
        .iter()
        .map(|commit| {
            ListItem::new(Line::from(vec![
                Span::styled(commit.short_id.as_str(), Style::default().fg(theme.warning)),
                Span::raw(" "),
                Span::raw(commit.summary.as_str()),
            ]))
        })
        .collect();

    let hidden = hidden_count(state, pane);
    if hidden > 0 {
        items.push(ListItem::new(Line::styled(
            format!("... and {hidden} more"),
            Style::default().fg(theme.muted),
        )));
    }

    let mut list = List::new(items).block(block);
    let mut list_state = ListState::default();
    if focused {
        list = list
            .highlight_style(
                Style::default()
                    .bg(theme.secondary)
                    .fg(theme.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        list_state.select(Some(state.pane_selection(pane)));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn commit_date(commit: &Commit) -> String {
    commit.timestamp.map_or_else(
        || commit.date_text.clone(),
        |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// One-line detail strip for the focused pane's selected commit
pub fn draw_detail(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(commit) = state.selected_commit() else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {}", commit.short_id),
            Style::default().fg(theme.warning),
        ),
        Span::styled(" | ", Style::default().fg(theme.muted)),
        Span::raw(commit.author.as_str()),
        Span::styled(" | ", Style::default().fg(theme.muted)),
        Span::styled(commit_date(commit), Style::default().fg(theme.secondary)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
