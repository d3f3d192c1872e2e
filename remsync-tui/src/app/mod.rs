mod actions;
mod spawn;

use crate::{components, keymap, theme::Theme};
use actions::{
    apply_loaded_branches, dispatch_branch_loading, dispatch_compare, dispatch_fetch,
    handle_confirm_create_branch, handle_confirm_sync, handle_fetch, handle_form_submit,
    handle_go_back, handle_move, handle_move_to_end, handle_open_add_remote,
    handle_open_branch_selector, handle_reload_branches, handle_request_create_branch,
    handle_request_sync, handle_show_branch_info, handle_show_help, handle_switch_branch,
    handle_text_edit,
};
use crossterm::event::{self, Event, KeyEventKind};
use fuzzy_matcher::skim::SkimMatcherV2;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use remsync_core::{
    action::Action,
    config::GitConfig,
    event::AppEvent,
    git::GitProvider,
    state::{AppState, Mode},
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    time::{Duration, Instant},
};

/// Limits applied to background git work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub network_timeout: Duration,
    pub commit_limit: usize,
}

impl SessionSettings {
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            network_timeout: config.network_timeout(),
            commit_limit: config.commit_limit,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&GitConfig::default())
    }
}

/// Handle for dispatching background work
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
    cancel: Arc<AtomicBool>,
}

impl EventSender {
    /// Send an event from a background thread to the main loop
    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn run(
    terminal: &mut DefaultTerminal,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    theme: &Theme,
    settings: &SessionSettings,
) -> anyhow::Result<()> {
    let matcher = SkimMatcherV2::default();
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let cancel = Arc::new(AtomicBool::new(false));
    let event_sender = EventSender {
        tx,
        cancel: Arc::clone(&cancel),
    };
    let spinner_start = Instant::now();

    // A session with both remotes starts by fetching them
    if state.has_two_remotes() {
        dispatch_fetch(state, git, &event_sender, settings);
    }

    loop {
        terminal.draw(|f| draw(f, state, theme, &spinner_start))?;

        // Check background channel (non-blocking)
        if let Ok(app_event) = rx.try_recv() {
            process_app_event(app_event, state, git, &matcher, &event_sender, settings);
            continue;
        }

        // Poll terminal events with a timeout so we can update spinner + check channel
        if event::poll(Duration::from_millis(80))?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(action) = keymap::resolve_action(key, state)
                && process_action(action, state, git, &matcher, &event_sender, settings)
            {
                return Ok(());
            }
        }
    }
}

fn spinner_frame(start: &Instant) -> &'static str {
    let elapsed = start.elapsed().as_millis() as usize;
    SPINNER_FRAMES[(elapsed / 80) % SPINNER_FRAMES.len()]
}

fn draw(f: &mut Frame, state: &AppState, theme: &Theme, spinner_start: &Instant) {
    let spinner = spinner_frame(spinner_start);
    let message_rows = u16::from(state.message.is_some());
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(message_rows),
        Constraint::Length(1),
    ])
    .split(f.area());

    components::header::draw(f, chunks[0], state, theme, spinner);
    components::commit_list::draw(f, chunks[1], state, theme);
    components::commit_list::draw_detail(f, chunks[2], state, theme);
    components::status_bar::draw(f, chunks[3], state, theme);
    components::footer::draw(f, chunks[4], state, theme);

    let area = f.area();
    match &state.mode {
        Mode::Normal => {}
        Mode::Help => components::help::draw(f, area, theme),
        Mode::AddRemote => components::add_remote::draw(f, area, state, theme),
        Mode::BranchSelect { .. } => components::branch_picker::draw(f, area, state, theme),
        Mode::ConfirmBranchCreate { .. } => {
            components::branch_picker::draw(f, area, state, theme);
            components::confirm::draw_create_branch(f, area, state, theme);
        }
        Mode::BranchInfo => {
            components::branch_picker::draw(f, area, state, theme);
            components::branch_info::draw(f, area, state, theme);
        }
        Mode::ConfirmSync { .. } => components::confirm::draw_sync(f, area, state, theme),
    }
}

/// Handle events from background tasks
fn process_app_event(
    event: AppEvent,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    matcher: &SkimMatcherV2,
    sender: &EventSender,
    settings: &SessionSettings,
) {
    match event {
        AppEvent::FetchCompleted(Ok(())) => dispatch_compare(state, git, sender, settings),
        AppEvent::FetchCompleted(Err(e)) => {
            log::warn!("fetch failed: {e}");
            state.loading = false;
            state.set_message(format!("Fetch failed: {e}. Press 'f' to retry."));
        }
        AppEvent::CompareCompleted(result) => {
            state.loading = false;
            match result {
                // A result for a branch the session has since left is stale
                Ok(result) if result.branch == state.branch => state.set_comparison(result),
                Ok(result) => log::debug!("dropping stale comparison for {}", result.branch),
                Err(e) => {
                    log::warn!("compare failed: {e}");
                    state.set_message(format!("Compare failed: {e}"));
                }
            }
        }
        AppEvent::SyncCompleted(result) => {
            if matches!(state.mode, Mode::ConfirmSync { .. }) {
                state.mode = Mode::Normal;
            }
            match result {
                Ok(direction) => {
                    log::info!("sync completed ({direction:?})");
                    state.set_message("Sync successful!");
                }
                Err(e) => {
                    log::warn!("sync failed: {e}");
                    state.set_message(format!("Sync failed: {e}"));
                }
            }
            // Always re-verify against the remotes rather than assume the outcome
            dispatch_fetch(state, git, sender, settings);
        }
        AppEvent::RemoteAdded(result) => {
            state.loading = false;
            if state.mode == Mode::AddRemote {
                state.mode = Mode::Normal;
            }
            match result {
                Ok(remote) => {
                    state.set_message(format!(
                        "Remote '{}' added successfully! Press 'f' to fetch.",
                        remote.name
                    ));
                    state.remote_b = Some(remote);
                }
                Err(e) => {
                    log::warn!("add remote failed: {e}");
                    state.set_message(format!("Failed to add remote: {e}"));
                }
            }
        }
        AppEvent::BranchesLoaded(result) => {
            state.loading_branches = false;
            match result {
                Ok(branches) => apply_loaded_branches(state, branches, matcher),
                Err(e) => {
                    log::warn!("branch listing failed: {e}");
                    if matches!(state.mode, Mode::BranchSelect { .. }) {
                        state.mode = Mode::Normal;
                    }
                    state.set_message(format!("Failed to load branches: {e}"));
                }
            }
        }
        AppEvent::BranchCreated {
            branch,
            remote,
            result,
        } => {
            state.loading = false;
            match result {
                Ok(()) => {
                    state.set_message(format!("Branch '{branch}' created on {remote}."));
                    if branch == state.branch {
                        dispatch_fetch(state, git, sender, settings);
                    }
                }
                Err(e) => {
                    log::warn!("branch creation failed: {e}");
                    state.set_message(format!("Failed to create branch: {e}"));
                }
            }
            if matches!(state.mode, Mode::BranchSelect { .. })
                || state.mode.is_nested_in_branch_select()
            {
                dispatch_branch_loading(state, git, sender);
            }
        }
    }
}

/// Apply a user action. Returns `true` when the session should end.
#[allow(clippy::needless_pass_by_value)]
fn process_action(
    action: Action,
    state: &mut AppState,
    git: &Arc<dyn GitProvider>,
    matcher: &SkimMatcherV2,
    sender: &EventSender,
    settings: &SessionSettings,
) -> bool {
    match action {
        Action::Quit => {
            // Tasks that have not reached git yet skip their work
            sender.cancel.store(true, Ordering::Relaxed);
            return true;
        }
        Action::ShowHelp => handle_show_help(state),
        Action::GoBack => handle_go_back(state),

        Action::Fetch => handle_fetch(state, git, sender, settings),
        Action::RequestSync => handle_request_sync(state),
        Action::ConfirmSync => handle_confirm_sync(state, git, sender, settings),
        Action::ToggleFocus => {
            if state.mode == Mode::Normal && state.has_two_remotes() {
                state.focus = state.focus.toggled();
            }
        }
        Action::MoveSelection(delta) => handle_move(state, delta),
        Action::MoveTop => handle_move_to_end(state, true),
        Action::MoveBottom => handle_move_to_end(state, false),

        Action::OpenAddRemote => handle_open_add_remote(state),
        Action::FormNextField | Action::FormPrevField => {
            if state.mode == Mode::AddRemote {
                state.add_remote.switch_field();
            }
        }
        Action::FormSubmit => handle_form_submit(state, git, sender),

        Action::OpenBranchSelector => handle_open_branch_selector(state, git, sender),
        Action::SwitchBranch => handle_switch_branch(state, git, sender, settings),
        Action::ReloadBranches => handle_reload_branches(state, git, sender),
        Action::StartSearch => {
            if state.mode == (Mode::BranchSelect { searching: false }) {
                state.branch_list.query.cursor_end();
                state.mode = Mode::BranchSelect { searching: true };
            }
        }
        Action::ExitSearch => {
            if state.mode == (Mode::BranchSelect { searching: true }) {
                state.mode = Mode::BranchSelect { searching: false };
            }
        }
        Action::RequestCreateBranch => handle_request_create_branch(state),
        Action::ConfirmCreateBranch => handle_confirm_create_branch(state, git, sender, settings),
        Action::ShowBranchInfo => handle_show_branch_info(state),

        Action::SearchPush(c) => handle_text_edit(state, matcher, |input| input.insert_char(c)),
        Action::SearchPop => handle_text_edit(state, matcher, |input| {
            input.backspace();
        }),
        Action::SearchDeleteWord => handle_text_edit(state, matcher, |input| input.delete_word()),
        Action::CursorLeft => handle_text_edit(state, matcher, |input| input.cursor_left()),
        Action::CursorRight => handle_text_edit(state, matcher, |input| input.cursor_right()),
        Action::CursorStart => handle_text_edit(state, matcher, |input| input.cursor_start()),
        Action::CursorEnd => handle_text_edit(state, matcher, |input| input.cursor_end()),
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use actions::BUSY_MESSAGE;
    use remsync_core::{
        compare::{ComparisonResult, SyncStatus},
        git::{
            Remote,
            mock::{MockGitProvider, commit},
        },
        state::{FormField, Pane},
        sync::SyncDirection,
    };
    use std::sync::mpsc::Receiver;

    struct Harness {
        state: AppState,
        git: Arc<dyn GitProvider>,
        mock: Arc<MockGitProvider>,
        matcher: SkimMatcherV2,
        sender: EventSender,
        rx: Receiver<AppEvent>,
        settings: SessionSettings,
    }

    impl Harness {
        fn new(mock: MockGitProvider, two_remotes: bool) -> Self {
            let remote_b = two_remotes.then(|| remote("upstream"));
            let mock = Arc::new(mock);
            let git: Arc<dyn GitProvider> = mock.clone();
            let (tx, rx) = mpsc::channel();
            Self {
                state: AppState::new(remote("origin"), remote_b, "main"),
                git,
                mock,
                matcher: SkimMatcherV2::default(),
                sender: EventSender {
                    tx,
                    cancel: Arc::new(AtomicBool::new(false)),
                },
                rx,
                settings: SessionSettings::default(),
            }
        }

        /// Session whose initial fetch+compare already finished
        fn ready(mock: MockGitProvider) -> Self {
            let mut h = Self::new(mock, true);
            h.state.loading = false;
            h
        }

        fn act(&mut self, action: Action) -> bool {
            process_action(
                action,
                &mut self.state,
                &self.git,
                &self.matcher,
                &self.sender,
                &self.settings,
            )
        }

        fn next_event(&self) -> AppEvent {
            self.rx.recv_timeout(Duration::from_secs(1)).unwrap()
        }

        fn apply(&mut self, event: AppEvent) {
            process_app_event(
                event,
                &mut self.state,
                &self.git,
                &self.matcher,
                &self.sender,
                &self.settings,
            );
        }

        /// Receive and process the next completion event
        fn pump(&mut self) -> AppEvent {
            let event = self.next_event();
            self.apply(event.clone());
            event
        }

        fn assert_idle(&self) {
            assert!(
                self.rx.recv_timeout(Duration::from_millis(100)).is_err(),
                "no background work expected"
            );
        }
    }

    fn remote(name: &str) -> Remote {
        Remote {
            name: name.into(),
            url: format!("https://example.com/{name}.git"),
        }
    }

    fn result(status: SyncStatus) -> ComparisonResult {
        ComparisonResult {
            branch: "main".into(),
            status,
            ahead_a: 1,
            ahead_b: 0,
            tip_a: Some("a".into()),
            tip_b: Some("b".into()),
            has_branch_a: true,
            has_branch_b: true,
            unique_a: vec![commit("a", "one")],
            unique_b: vec![],
        }
    }

    /// origin is one commit ahead of upstream on main
    fn ahead_mock() -> MockGitProvider {
        let mut git = MockGitProvider::default();
        git.set_tip("origin", "main", "aaa");
        git.set_tip("upstream", "main", "bbb");
        git.set_count("bbb", "aaa", 1);
        git.set_log("bbb", "aaa", vec![commit("aaa", "new work")]);
        git
    }

    fn branch_mock() -> MockGitProvider {
        let mut git = ahead_mock();
        git.heads
            .insert("origin".into(), vec!["main".into(), "feat".into()]);
        git.heads
            .insert("upstream".into(), vec!["main".into(), "docs".into()]);
        git
    }

    #[test]
    fn test_fetch_then_compare() {
        let mut h = Harness::ready(ahead_mock());
        h.act(Action::Fetch);
        assert!(h.state.loading);

        assert!(matches!(h.pump(), AppEvent::FetchCompleted(Ok(()))));
        assert!(h.state.loading, "compare keeps the session busy");
        assert_eq!(*h.mock.fetch_calls.lock().unwrap(), vec!["origin", "upstream"]);

        assert!(matches!(h.pump(), AppEvent::CompareCompleted(Ok(_))));
        assert!(!h.state.loading);
        let comparison = h.state.comparison.as_ref().unwrap();
        assert_eq!(comparison.status, SyncStatus::AheadA);
        assert_eq!(h.state.pane_commits(Pane::A)[0].summary, "new work");
    }

    #[test]
    fn test_fetch_failure_on_first_remote_skips_second() {
        let git = ahead_mock();
        git.fetch_results.lock().unwrap().insert(
            "origin".into(),
            Err(anyhow::anyhow!("fetch from origin timed out after 30 seconds")),
        );
        let mut h = Harness::ready(git);
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::Fetch);
        h.pump();

        assert!(!h.state.loading);
        assert_eq!(*h.mock.fetch_calls.lock().unwrap(), vec!["origin"]);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Fetch failed: fetch from origin timed out after 30 seconds. Press 'f' to retry.")
        );
        assert!(h.state.comparison.is_some(), "previous result is kept");
        h.assert_idle();
    }

    #[test]
    fn test_compare_failure_reports_message() {
        let mut git = ahead_mock();
        git.count_error = Some("bad object".into());
        let mut h = Harness::ready(git);
        h.act(Action::Fetch);
        h.pump();
        h.pump();
        assert!(!h.state.loading);
        let message = h.state.message.as_deref().unwrap();
        assert!(message.starts_with("Compare failed: "), "{message}");
        assert!(message.contains("bad object"), "{message}");
    }

    #[test]
    fn test_loading_rejects_mutating_commands() {
        let mut h = Harness::new(ahead_mock(), true);
        assert!(h.state.loading);
        let before = h.state.clone();
        for action in [
            Action::Fetch,
            Action::RequestSync,
            Action::OpenBranchSelector,
        ] {
            h.act(action);
            assert_eq!(h.state.message.as_deref(), Some(BUSY_MESSAGE));
            let mut unchanged = h.state.clone();
            unchanged.message.clone_from(&before.message);
            assert_eq!(unchanged, before);
        }
        h.assert_idle();
    }

    #[test]
    fn test_sync_requires_ahead_status() {
        let mut h = Harness::ready(MockGitProvider::default());
        h.act(Action::RequestSync);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Nothing to sync yet. Press 'f' to fetch.")
        );

        h.state.set_comparison(result(SyncStatus::Diverged));
        h.act(Action::RequestSync);
        assert_eq!(h.state.mode, Mode::Normal);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Remotes have diverged - manual intervention required")
        );

        h.state.set_comparison(result(SyncStatus::InSync));
        h.act(Action::RequestSync);
        assert_eq!(h.state.message.as_deref(), Some("Remotes are already in sync"));

        h.state.set_comparison(result(SyncStatus::BranchMissing));
        h.act(Action::RequestSync);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Branch is missing on one remote. Press 'b' then 'c' to create it.")
        );
        assert!(h.mock.push_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sync_confirm_pushes_then_refetches() {
        let mut h = Harness::ready(ahead_mock());
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::RequestSync);
        assert_eq!(
            h.state.mode,
            Mode::ConfirmSync {
                direction: SyncDirection::AToB
            }
        );

        h.act(Action::ConfirmSync);
        assert_eq!(h.state.mode, Mode::Normal);
        assert!(h.state.loading);
        assert!(matches!(h.pump(), AppEvent::SyncCompleted(Ok(SyncDirection::AToB))));
        assert_eq!(h.state.message.as_deref(), Some("Sync successful!"));
        assert_eq!(
            *h.mock.push_calls.lock().unwrap(),
            vec![(
                "upstream".to_string(),
                "refs/remotes/origin/main".to_string(),
                "main".to_string()
            )]
        );

        // Re-verification runs fetch then compare
        assert!(matches!(h.pump(), AppEvent::FetchCompleted(Ok(()))));
        assert!(matches!(h.pump(), AppEvent::CompareCompleted(Ok(_))));
        assert!(!h.state.loading);
        assert_eq!(h.state.message.as_deref(), Some("Sync successful!"));
    }

    #[test]
    fn test_sync_failure_still_refetches() {
        let git = ahead_mock();
        *git.push_result.lock().unwrap() = Some(Err(anyhow::anyhow!("rejected (non-fast-forward)")));
        let mut h = Harness::ready(git);
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::RequestSync);
        h.act(Action::ConfirmSync);
        h.pump();
        assert_eq!(
            h.state.message.as_deref(),
            Some("Sync failed: rejected (non-fast-forward)")
        );
        assert!(matches!(h.pump(), AppEvent::FetchCompleted(_)));
    }

    #[test]
    fn test_cancel_sync_confirm() {
        let mut h = Harness::ready(ahead_mock());
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::RequestSync);
        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::Normal);
        h.assert_idle();
    }

    #[test]
    fn test_sync_completion_keeps_help_open() {
        let mut h = Harness::ready(ahead_mock());
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::RequestSync);
        h.act(Action::ConfirmSync);
        h.act(Action::ShowHelp);
        assert_eq!(h.state.mode, Mode::Help);
        assert!(matches!(h.pump(), AppEvent::SyncCompleted(Ok(_))));
        assert_eq!(h.state.mode, Mode::Help);
        assert!(matches!(h.pump(), AppEvent::FetchCompleted(Ok(()))));
        assert!(matches!(h.pump(), AppEvent::CompareCompleted(Ok(_))));
    }

    #[test]
    fn test_sync_refuses_comparison_without_ahead_side() {
        let mut h = Harness::ready(ahead_mock());
        h.state.set_comparison(result(SyncStatus::InSync));
        h.state.mode = Mode::ConfirmSync {
            direction: SyncDirection::AToB,
        };
        h.act(Action::ConfirmSync);
        assert!(matches!(h.pump(), AppEvent::SyncCompleted(Err(_))));
        assert!(
            h.state
                .message
                .as_deref()
                .unwrap()
                .starts_with("Sync failed: cannot sync main")
        );
        assert!(h.mock.push_calls.lock().unwrap().is_empty());
        assert!(matches!(h.pump(), AppEvent::FetchCompleted(_)));
    }

    #[test]
    fn test_one_remote_session() {
        let mut h = Harness::new(MockGitProvider::default(), false);
        assert!(!h.state.loading);
        h.act(Action::Fetch);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Need 2 remotes to fetch and compare. Press 'a' to add a second remote.")
        );
        h.act(Action::OpenBranchSelector);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Need 2 remotes for branch management. Press 'a' to add a second remote.")
        );
        assert_eq!(h.state.mode, Mode::Normal);
        h.assert_idle();
    }

    #[test]
    fn test_add_remote_flow() {
        let mut h = Harness::new(MockGitProvider::with_remotes(&[("origin", "o")]), false);
        h.act(Action::OpenAddRemote);
        assert_eq!(h.state.mode, Mode::AddRemote);
        for c in "upstream".chars() {
            h.act(Action::SearchPush(c));
        }
        h.act(Action::FormNextField);
        assert_eq!(h.state.add_remote.field, FormField::Url);
        for c in "https://example.com/u.git".chars() {
            h.act(Action::SearchPush(c));
        }
        h.act(Action::FormSubmit);
        assert_eq!(h.state.mode, Mode::Normal);
        assert!(h.state.loading);

        h.pump();
        assert!(!h.state.loading);
        assert_eq!(
            h.state.remote_b.as_ref().map(|r| r.url.as_str()),
            Some("https://example.com/u.git")
        );
        assert_eq!(
            h.state.message.as_deref(),
            Some("Remote 'upstream' added successfully! Press 'f' to fetch.")
        );
    }

    #[test]
    fn test_add_remote_requires_both_fields() {
        let mut h = Harness::new(MockGitProvider::default(), false);
        h.act(Action::OpenAddRemote);
        h.act(Action::SearchPush('x'));
        h.act(Action::FormSubmit);
        assert_eq!(h.state.mode, Mode::AddRemote);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Both name and URL are required")
        );
        h.assert_idle();
    }

    #[test]
    fn test_add_remote_failure_closes_form() {
        let git = MockGitProvider::with_remotes(&[("origin", "o")]);
        let mut h = Harness::new(git, false);
        h.act(Action::OpenAddRemote);
        for c in "origin".chars() {
            h.act(Action::SearchPush(c));
        }
        h.act(Action::FormNextField);
        h.act(Action::SearchPush('u'));
        h.act(Action::FormSubmit);
        h.pump();
        assert_eq!(h.state.mode, Mode::Normal);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Failed to add remote: remote 'origin' already exists")
        );
        assert!(h.state.remote_b.is_none());
    }

    #[test]
    fn test_add_remote_rejected_with_two_remotes() {
        let mut h = Harness::ready(MockGitProvider::default());
        h.act(Action::OpenAddRemote);
        assert_eq!(h.state.mode, Mode::Normal);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Already have 2 remotes configured")
        );
    }

    #[test]
    fn test_cancel_add_remote_discards_input() {
        let mut h = Harness::new(MockGitProvider::default(), false);
        h.act(Action::OpenAddRemote);
        h.act(Action::SearchPush('x'));
        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::Normal);
        assert!(h.state.add_remote.name.is_empty());
    }

    #[test]
    fn test_branch_selector_loads_and_selects_current() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
        assert!(h.state.loading_branches);
        h.pump();
        assert!(!h.state.loading_branches);
        let names: Vec<&str> = h.state.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["docs", "feat", "main"]);
        assert_eq!(h.state.selected_branch().unwrap().name, "main");
    }

    #[test]
    fn test_branch_load_failure_closes_selector() {
        let mut git = branch_mock();
        git.list_heads_error = Some("could not read from remote".into());
        let mut h = Harness::ready(git);
        h.act(Action::OpenBranchSelector);
        h.pump();
        assert_eq!(h.state.mode, Mode::Normal);
        let message = h.state.message.as_deref().unwrap();
        assert!(message.starts_with("Failed to load branches: "), "{message}");
    }

    #[test]
    fn test_search_filters_and_keeps_filter_after_exit() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::StartSearch);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: true });
        for c in "fe".chars() {
            h.act(Action::SearchPush(c));
        }
        assert_eq!(h.state.selected_branch().unwrap().name, "feat");
        assert_eq!(h.state.branch_list.filtered.len(), 1);

        h.act(Action::ExitSearch);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
        assert_eq!(h.state.branch_list.query.text, "fe");
        assert_eq!(h.state.branch_list.filtered.len(), 1);

        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::Normal);
        assert!(h.state.branch_list.query.is_empty());
    }

    #[test]
    fn test_switch_branch_refetches_for_new_branch() {
        let mut h = Harness::ready(branch_mock());
        h.state.set_comparison(result(SyncStatus::AheadA));
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::MoveTop);
        h.act(Action::SwitchBranch);

        assert_eq!(h.state.mode, Mode::Normal);
        assert_eq!(h.state.branch, "docs");
        assert!(h.state.comparison.is_none());
        assert!(h.state.loading);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Switched to branch 'docs'.")
        );

        h.pump();
        h.pump();
        let comparison = h.state.comparison.as_ref().unwrap();
        assert_eq!(comparison.branch, "docs");
        assert_eq!(comparison.status, SyncStatus::BranchMissing);
    }

    #[test]
    fn test_switch_to_same_branch() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::SwitchBranch);
        assert_eq!(h.state.message.as_deref(), Some("Already on this branch"));
        assert_eq!(h.state.mode, Mode::Normal);
        h.assert_idle();
    }

    #[test]
    fn test_stale_comparison_dropped() {
        let mut h = Harness::ready(MockGitProvider::default());
        h.state.branch = "develop".into();
        h.apply(AppEvent::CompareCompleted(Ok(result(SyncStatus::AheadA))));
        assert!(h.state.comparison.is_none());
        assert!(!h.state.loading);
    }

    #[test]
    fn test_create_branch_rejected_when_on_both() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        assert_eq!(h.state.selected_branch().unwrap().name, "main");
        h.act(Action::RequestCreateBranch);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
        assert_eq!(
            h.state.message.as_deref(),
            Some("Branch exists on both remotes or neither remote")
        );
        assert!(h.mock.push_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_create_branch_pushes_to_missing_remote_and_reloads() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::MoveSelection(-1));
        assert_eq!(h.state.selected_branch().unwrap().name, "feat");
        h.act(Action::RequestCreateBranch);
        assert_eq!(
            h.state.mode,
            Mode::ConfirmBranchCreate {
                branch: "feat".into(),
                target: "upstream".into(),
                source: "origin".into(),
            }
        );

        h.act(Action::ConfirmCreateBranch);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
        assert!(h.state.loading);
        assert!(matches!(h.pump(), AppEvent::BranchCreated { .. }));
        assert!(!h.state.loading);
        assert_eq!(
            h.state.message.as_deref(),
            Some("Branch 'feat' created on upstream.")
        );
        assert_eq!(
            *h.mock.push_calls.lock().unwrap(),
            vec![(
                "upstream".to_string(),
                "refs/remotes/origin/feat".to_string(),
                "feat".to_string()
            )]
        );
        assert!(h.state.loading_branches);
        assert!(matches!(h.pump(), AppEvent::BranchesLoaded(Ok(_))));
    }

    #[test]
    fn test_create_branch_failure_reports_and_reloads() {
        let git = branch_mock();
        *git.push_result.lock().unwrap() = Some(Err(anyhow::anyhow!("permission denied")));
        let mut h = Harness::ready(git);
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::MoveTop);
        h.act(Action::RequestCreateBranch);
        h.act(Action::ConfirmCreateBranch);
        h.pump();
        assert_eq!(
            h.state.message.as_deref(),
            Some("Failed to create branch: permission denied")
        );
        assert!(matches!(h.pump(), AppEvent::BranchesLoaded(Ok(_))));
    }

    #[test]
    fn test_create_branch_reloads_when_info_opened_during_push() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::MoveSelection(-1));
        h.act(Action::RequestCreateBranch);
        h.act(Action::ConfirmCreateBranch);
        h.act(Action::ShowBranchInfo);
        assert_eq!(h.state.mode, Mode::BranchInfo);

        assert!(matches!(h.pump(), AppEvent::BranchCreated { .. }));
        assert!(h.state.loading_branches);
        assert_eq!(h.state.mode, Mode::BranchInfo);
        assert!(matches!(h.pump(), AppEvent::BranchesLoaded(Ok(_))));
        assert!(!h.state.loading_branches);
    }

    #[test]
    fn test_nested_overlays_cancel_to_selector() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::ShowBranchInfo);
        assert_eq!(h.state.mode, Mode::BranchInfo);
        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });

        h.act(Action::MoveTop);
        h.act(Action::RequestCreateBranch);
        assert!(matches!(h.state.mode, Mode::ConfirmBranchCreate { .. }));
        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
        h.assert_idle();
    }

    #[test]
    fn test_text_edits_ignored_outside_inputs() {
        let mut h = Harness::ready(branch_mock());
        h.act(Action::OpenBranchSelector);
        h.pump();
        h.act(Action::SearchPush('x'));
        assert!(h.state.branch_list.query.text.is_empty());

        h.state.mode = Mode::Normal;
        h.act(Action::SearchPush('x'));
        assert!(h.state.add_remote.focused_mut().text.is_empty());
    }

    #[test]
    fn test_help_only_from_normal() {
        let mut h = Harness::ready(MockGitProvider::default());
        h.act(Action::ShowHelp);
        assert_eq!(h.state.mode, Mode::Help);
        h.act(Action::GoBack);
        assert_eq!(h.state.mode, Mode::Normal);

        h.state.mode = Mode::BranchSelect { searching: false };
        h.act(Action::ShowHelp);
        assert_eq!(h.state.mode, Mode::BranchSelect { searching: false });
    }

    #[test]
    fn test_focus_and_selection() {
        let mut h = Harness::ready(MockGitProvider::default());
        let mut r = result(SyncStatus::AheadA);
        r.unique_a = vec![commit("c3", "three"), commit("c2", "two"), commit("c1", "one")];
        h.apply(AppEvent::CompareCompleted(Ok(r)));
        h.act(Action::MoveSelection(1));
        h.act(Action::MoveBottom);
        assert_eq!(h.state.selected_commit().unwrap().summary, "one");
        h.act(Action::ToggleFocus);
        assert_eq!(h.state.focus, Pane::B);
        assert!(h.state.selected_commit().is_none());
        h.act(Action::ToggleFocus);
        h.act(Action::MoveTop);
        assert_eq!(h.state.selected_commit().unwrap().summary, "three");
    }

    #[test]
    fn test_quit_sets_cancel_flag() {
        let mut h = Harness::ready(MockGitProvider::default());
        assert!(h.act(Action::Quit));
        assert!(h.sender.cancel.load(Ordering::Relaxed));

        // Cancelled tasks never reach git
        h.act(Action::Fetch);
        h.assert_idle();
        assert!(h.mock.fetch_calls.lock().unwrap().is_empty());
    }
}
