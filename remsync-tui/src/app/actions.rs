use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use remsync_core::{
    SyncStatus,
    git::{GitProvider, RemoteBranch},
    state::{AppState, Mode, SearchableList, TextInput},
    sync::SyncDirection,
};
use std::sync::Arc;

use super::spawn::{
    spawn_add_remote, spawn_branch_creation, spawn_branch_loading, spawn_compare, spawn_fetch,
    spawn_sync,
};
use super::{EventSender, SessionSettings};

pub(super) const BUSY_MESSAGE: &str = "Busy, wait for the current operation to finish";
const NEED_REMOTES_FOR_FETCH: &str =
    "Need 2 remotes to fetch and compare. Press 'a' to add a second remote.";
const NEED_REMOTES_FOR_BRANCHES: &str =
    "Need 2 remotes for branch management. Press 'a' to add a second remote.";

/// Start fetch+compare. Leaves any current message alone.
pub(super) fn dispatch_fetch(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    let Some((a, b)) = state.remote_names() else {
        return;
    };
    let (a, b) = (a.to_string(), b.to_string());
    log::info!("fetching {a} and {b}");
    state.loading = true;
    spawn_fetch(git, sender, a, b, settings.network_timeout);
}

pub(super) fn dispatch_compare(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    let Some((a, b)) = state.remote_names() else {
        state.loading = false;
        return;
    };
    let (a, b) = (a.to_string(), b.to_string());
    state.loading = true;
    spawn_compare(git, sender, a, b, state.branch.clone(), settings.commit_limit);
}

pub(super) fn dispatch_branch_loading(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
) {
    let Some((a, b)) = state.remote_names() else {
        return;
    };
    let (a, b) = (a.to_string(), b.to_string());
    state.loading_branches = true;
    spawn_branch_loading(git, sender, a, b);
}

pub(super) fn handle_fetch(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    if !state.has_two_remotes() {
        state.set_message(NEED_REMOTES_FOR_FETCH);
        return;
    }
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    state.message = None;
    dispatch_fetch(state, git, sender, settings);
}

pub(super) fn handle_request_sync(state: &mut AppState) {
    if !state.has_two_remotes() {
        state.set_message(NEED_REMOTES_FOR_FETCH);
        return;
    }
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    let Some(result) = &state.comparison else {
        state.set_message("Nothing to sync yet. Press 'f' to fetch.");
        return;
    };
    match SyncDirection::from_status(result.status) {
        Some(direction) => state.mode = Mode::ConfirmSync { direction },
        None => {
            let message = match result.status {
                SyncStatus::InSync => "Remotes are already in sync",
                SyncStatus::Diverged => "Remotes have diverged - manual intervention required",
                _ => "Branch is missing on one remote. Press 'b' then 'c' to create it.",
            };
            state.set_message(message);
        }
    }
}

pub(super) fn handle_confirm_sync(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    let Mode::ConfirmSync { direction } = state.mode else {
        return;
    };
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    let Some((a, b)) = state.remote_names() else {
        return;
    };
    let (a, b) = (a.to_string(), b.to_string());
    state.mode = Mode::Normal;
    let Some(comparison) = state.comparison.clone() else {
        return;
    };
    let (source, dest) = direction.endpoints(&a, &b);
    state.set_message(format!("Syncing {} from {source} to {dest}...", state.branch));
    state.loading = true;
    spawn_sync(git, sender, comparison, a, b, settings.network_timeout);
}

pub(super) fn handle_open_add_remote(state: &mut AppState) {
    if state.has_two_remotes() {
        state.set_message("Already have 2 remotes configured");
        return;
    }
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    state.reset_add_remote_form();
    state.mode = Mode::AddRemote;
}

pub(super) fn handle_form_submit(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
) {
    if state.mode != Mode::AddRemote {
        return;
    }
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    let name = state.add_remote.name.text.trim().to_string();
    let url = state.add_remote.url.text.trim().to_string();
    if name.is_empty() || url.is_empty() {
        state.set_message("Both name and URL are required");
        return;
    }
    log::info!("adding remote {name} -> {url}");
    state.reset_add_remote_form();
    state.mode = Mode::Normal;
    state.message = None;
    state.loading = true;
    spawn_add_remote(git, sender, name, url);
}

pub(super) fn handle_open_branch_selector(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
) {
    if !state.has_two_remotes() {
        state.set_message(NEED_REMOTES_FOR_BRANCHES);
        return;
    }
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    state.branches.clear();
    state.branch_list.reset(0);
    state.mode = Mode::BranchSelect { searching: false };
    dispatch_branch_loading(state, git, sender);
}

pub(super) fn handle_reload_branches(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
) {
    if !matches!(state.mode, Mode::BranchSelect { .. }) || state.loading_branches {
        return;
    }
    dispatch_branch_loading(state, git, sender);
}

/// Install a freshly loaded branch list, keeping the filter and highlighting the
/// session's branch when it is visible
pub(super) fn apply_loaded_branches(
    state: &mut AppState,
    branches: Vec<RemoteBranch>,
    matcher: &SkimMatcherV2,
) {
    state.branches = branches;
    let names = branch_names(&state.branches);
    apply_fuzzy_filter(&mut state.branch_list, &names, matcher);
    if let Some(current) = state.branches.iter().position(|b| b.name == state.branch) {
        state.branch_list.select_index(current);
    }
}

pub(super) fn handle_switch_branch(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    let Some(name) = state.selected_branch().map(|b| b.name.clone()) else {
        return;
    };
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    state.branch_list.reset(0);
    state.mode = Mode::Normal;
    if name == state.branch {
        state.set_message("Already on this branch");
        return;
    }
    log::info!("switching target branch {} -> {name}", state.branch);
    state.switch_branch(name.clone());
    state.set_message(format!("Switched to branch '{name}'."));
    dispatch_fetch(state, git, sender, settings);
}

pub(super) fn handle_request_create_branch(state: &mut AppState) {
    let Some(branch) = state.selected_branch() else {
        return;
    };
    if !branch.on_exactly_one() {
        state.set_message("Branch exists on both remotes or neither remote");
        return;
    }
    let Some((a, b)) = state.remote_names() else {
        return;
    };
    let (target, source) = if branch.on_a { (b, a) } else { (a, b) };
    let mode = Mode::ConfirmBranchCreate {
        branch: branch.name.clone(),
        target: target.to_string(),
        source: source.to_string(),
    };
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    state.mode = mode;
}

pub(super) fn handle_confirm_create_branch(
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    let Mode::ConfirmBranchCreate {
        branch,
        target,
        source,
    } = state.mode.clone()
    else {
        return;
    };
    if state.loading {
        state.set_message(BUSY_MESSAGE);
        return;
    }
    log::info!("creating {branch} on {target} from {source}");
    state.set_message(format!("Creating branch '{branch}' on {target}..."));
    state.mode = Mode::BranchSelect { searching: false };
    state.loading = true;
    spawn_branch_creation(git, sender, target, source, branch, settings.network_timeout);
}

pub(super) fn handle_show_branch_info(state: &mut AppState) {
    if state.selected_branch().is_some() {
        state.mode = Mode::BranchInfo;
    }
}

pub(super) fn handle_show_help(state: &mut AppState) {
    if state.mode == Mode::Help {
        state.mode = Mode::Normal;
    } else if !state.mode.is_modal() {
        state.mode = Mode::Help;
    }
}

pub(super) fn handle_go_back(state: &mut AppState) {
    if state.mode.is_nested_in_branch_select() {
        state.mode = Mode::BranchSelect { searching: false };
        return;
    }
    match state.mode {
        Mode::Normal => {}
        Mode::Help | Mode::ConfirmSync { .. } => state.mode = Mode::Normal,
        Mode::AddRemote => {
            state.reset_add_remote_form();
            state.mode = Mode::Normal;
        }
        Mode::BranchSelect { searching: true } => {
            state.mode = Mode::BranchSelect { searching: false };
        }
        Mode::BranchSelect { searching: false } => {
            state.branch_list.reset(0);
            state.mode = Mode::Normal;
        }
        Mode::ConfirmBranchCreate { .. } | Mode::BranchInfo => {}
    }
}

pub(super) fn handle_move(state: &mut AppState, delta: i32) {
    match state.mode {
        Mode::Normal => state.move_commit_selection(delta),
        Mode::BranchSelect { .. } => state.branch_list.move_selection(delta),
        _ => {}
    }
}

pub(super) fn handle_move_to_end(state: &mut AppState, top: bool) {
    match state.mode {
        Mode::Normal => {
            let delta = if top { i32::MIN } else { i32::MAX };
            state.move_commit_selection(delta);
        }
        Mode::BranchSelect { .. } if top => state.branch_list.move_to_top(),
        Mode::BranchSelect { .. } => state.branch_list.move_to_bottom(),
        _ => {}
    }
}

/// The text input keystrokes go to in the current mode
fn active_input(state: &mut AppState) -> Option<&mut TextInput> {
    if !state.mode.accepts_text() {
        return None;
    }
    match state.mode {
        Mode::AddRemote => Some(state.add_remote.focused_mut()),
        Mode::BranchSelect { searching: true } => Some(&mut state.branch_list.query),
        _ => None,
    }
}

/// Apply an edit to the active input, re-filtering the branch list if it was the query
pub(super) fn handle_text_edit(
    state: &mut AppState,
    matcher: &SkimMatcherV2,
    edit: impl FnOnce(&mut TextInput),
) {
    let Some(input) = active_input(state) else {
        return;
    };
    let before = input.text.clone();
    edit(input);
    let changed = input.text != before;
    if changed && matches!(state.mode, Mode::BranchSelect { searching: true }) {
        let names = branch_names(&state.branches);
        apply_fuzzy_filter(&mut state.branch_list, &names, matcher);
    }
}

fn branch_names(branches: &[RemoteBranch]) -> Vec<String> {
    branches.iter().map(|b| b.name.clone()).collect()
}

fn apply_fuzzy_filter(list: &mut SearchableList, items: &[String], matcher: &SkimMatcherV2) {
    let query = &list.query.text;
    if query.is_empty() {
        list.show_all(items.len());
        return;
    }
    let mut scored: Vec<(usize, i64)> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| matcher.fuzzy_match(item, query).map(|score| (i, score)))
        .collect();
    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| items[a.0].len().cmp(&items[b.0].len()))
            .then_with(|| items[a.0].cmp(&items[b.0]))
    });
    list.selected = None;
    list.set_filtered(scored);
}
