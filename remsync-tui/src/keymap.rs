use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use remsync_core::{
    action::Action,
    state::{AppState, Mode},
};

/// Resolve a key event into an Action based on current mode
pub fn resolve_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    // Global quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match &state.mode {
        Mode::Normal => resolve_normal_key(key.code),
        Mode::Help => resolve_help_key(key.code),
        Mode::AddRemote => resolve_form_key(key),
        Mode::BranchSelect { searching: true } => resolve_search_key(key),
        Mode::BranchSelect { searching: false } => resolve_branch_key(key.code),
        Mode::ConfirmBranchCreate { .. } => {
            resolve_confirm_key(key.code, Action::ConfirmCreateBranch)
        }
        Mode::ConfirmSync { .. } => resolve_confirm_key(key.code, Action::ConfirmSync),
        // Any key dismisses the info overlay
        Mode::BranchInfo => Some(Action::GoBack),
    }
}

fn resolve_normal_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ShowHelp),
        KeyCode::Char('f') => Some(Action::Fetch),
        KeyCode::Char('s') => Some(Action::RequestSync),
        KeyCode::Char('a') => Some(Action::OpenAddRemote),
        KeyCode::Char('b') => Some(Action::OpenBranchSelector),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::ToggleFocus),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveSelection(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveSelection(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::MoveTop),
        KeyCode::End | KeyCode::Char('G') => Some(Action::MoveBottom),
        _ => None,
    }
}

fn resolve_help_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::GoBack),
        _ => None,
    }
}

/// Keys shared by every text input
fn resolve_text_edit_key(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('w') | KeyCode::Backspace => Some(Action::SearchDeleteWord),
            KeyCode::Char('a') => Some(Action::CursorStart),
            KeyCode::Char('e') => Some(Action::CursorEnd),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Backspace => Some(Action::SearchPop),
        KeyCode::Left => Some(Action::CursorLeft),
        KeyCode::Right => Some(Action::CursorRight),
        KeyCode::Home => Some(Action::CursorStart),
        KeyCode::End => Some(Action::CursorEnd),
        KeyCode::Char(c) => Some(Action::SearchPush(c)),
        _ => None,
    }
}

fn resolve_form_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::GoBack),
        KeyCode::Enter => Some(Action::FormSubmit),
        KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
        _ => resolve_text_edit_key(key),
    }
}

fn resolve_search_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearch),
        KeyCode::Up => Some(Action::MoveSelection(-1)),
        KeyCode::Down => Some(Action::MoveSelection(1)),
        _ => resolve_text_edit_key(key),
    }
}

fn resolve_branch_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Esc => Some(Action::GoBack),
        KeyCode::Enter => Some(Action::SwitchBranch),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveSelection(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveSelection(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::MoveTop),
        KeyCode::End | KeyCode::Char('G') => Some(Action::MoveBottom),
        KeyCode::Char('/') => Some(Action::StartSearch),
        KeyCode::Char('r') => Some(Action::ReloadBranches),
        KeyCode::Char('c') => Some(Action::RequestCreateBranch),
        KeyCode::Char('i') => Some(Action::ShowBranchInfo),
        _ => None,
    }
}

fn resolve_confirm_key(key: KeyCode, confirm: Action) -> Option<Action> {
    match key {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(confirm),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::GoBack),
        _ => None,
    }
}
