use crate::{
    compare::ComparisonResult,
    git::{Commit, Remote, RemoteBranch},
    sync::SyncDirection,
};
use unicode_segmentation::UnicodeSegmentation;

/// Single-line editable text with a byte-offset cursor kept on grapheme boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn boundaries(&self) -> Vec<usize> {
        let mut boundaries: Vec<usize> =
            self.text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(self.text.len());
        boundaries
    }

    /// Snap the cursor onto a boundary and return that boundary's index
    fn clamp_cursor(&mut self, boundaries: &[usize]) -> usize {
        let cursor = self.cursor.min(self.text.len());
        let idx = match boundaries.binary_search(&cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        self.cursor = boundaries.get(idx).copied().unwrap_or(0);
        idx
    }

    pub fn insert_char(&mut self, c: char) {
        let boundaries = self.boundaries();
        self.clamp_cursor(&boundaries);
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the grapheme before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.boundaries();
        let idx = self.clamp_cursor(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn cursor_left(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.clamp_cursor(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    pub fn cursor_right(&mut self) {
        let boundaries = self.boundaries();
        let idx = self.clamp_cursor(&boundaries);
        if idx + 1 < boundaries.len() {
            self.cursor = boundaries[idx + 1];
        }
    }

    pub fn cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Delete back to the start of the previous word
    pub fn delete_word(&mut self) {
        let boundaries = self.boundaries();
        self.clamp_cursor(&boundaries);
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end();
        let start = trimmed
            .grapheme_indices(true)
            .rev()
            .find(|(_, g)| g.chars().all(char::is_whitespace))
            .map_or(0, |(i, g)| i + g.len());
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }
}

/// A filterable list: the query, the visible `(index, score)` pairs, and a selection
/// into the visible rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchableList {
    pub query: TextInput,
    /// Index-score pairs, sorted by score descending
    pub filtered: Vec<(usize, i64)>,
    pub selected: Option<usize>,
}

impl SearchableList {
    pub fn new(item_count: usize) -> Self {
        let mut list = Self::default();
        list.reset(item_count);
        list
    }

    pub fn reset(&mut self, item_count: usize) {
        self.query.clear();
        self.show_all(item_count);
    }

    /// Show every item in order without touching the query
    pub fn show_all(&mut self, item_count: usize) {
        self.filtered = (0..item_count).map(|i| (i, 0)).collect();
        self.selected = if item_count > 0 { Some(0) } else { None };
    }

    /// Replace the visible rows, keeping the selection in range
    pub fn set_filtered(&mut self, filtered: Vec<(usize, i64)>) {
        self.filtered = filtered;
        self.selected = match (self.filtered.len(), self.selected) {
            (0, _) => None,
            (len, Some(sel)) => Some(sel.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    /// Item index under the selection
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
            .and_then(|sel| self.filtered.get(sel))
            .map(|&(idx, _)| idx)
    }

    /// Select the visible row showing item `index`, if visible
    pub fn select_index(&mut self, index: usize) -> bool {
        if let Some(row) = self.filtered.iter().position(|&(i, _)| i == index) {
            self.selected = Some(row);
            true
        } else {
            false
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0);
        let step = delta.unsigned_abs() as usize;
        self.selected = Some(if delta > 0 {
            current.saturating_add(step).min(len - 1)
        } else {
            current.saturating_sub(step)
        });
    }

    pub fn move_to_top(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn move_to_bottom(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = Some(self.filtered.len() - 1);
        }
    }
}

/// Which commit pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    A,
    B,
}

impl Pane {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Url,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRemoteForm {
    pub name: TextInput,
    pub url: TextInput,
    pub field: FormField,
}

impl AddRemoteForm {
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Url => &mut self.url,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::Name,
        };
    }
}

/// The UI mode. Exactly one is active; overlays never stack except where a
/// variant's semantics say where cancel returns to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
    AddRemote,
    BranchSelect {
        searching: bool,
    },
    /// Nested under the branch selector
    ConfirmBranchCreate {
        branch: String,
        target: String,
        source: String,
    },
    /// Nested under the branch selector
    BranchInfo,
    ConfirmSync {
        direction: SyncDirection,
    },
}

impl Mode {
    /// Whether any overlay is showing on top of the main view
    pub fn is_modal(&self) -> bool {
        !matches!(self, Mode::Normal)
    }

    /// Overlays whose cancel key returns to the branch selector rather than Normal
    pub fn is_nested_in_branch_select(&self) -> bool {
        matches!(self, Mode::ConfirmBranchCreate { .. } | Mode::BranchInfo)
    }

    /// Modes where printable keys edit text rather than trigger commands
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Mode::AddRemote | Mode::BranchSelect { searching: true }
        )
    }
}

/// All interactive state of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub remote_a: Remote,
    pub remote_b: Option<Remote>,
    /// Branch every remote query targets; never checked out locally
    pub branch: String,
    pub comparison: Option<ComparisonResult>,
    pub mode: Mode,
    /// A mutating background operation is in flight
    pub loading: bool,
    pub message: Option<String>,
    pub focus: Pane,
    pub selected_a: usize,
    pub selected_b: usize,
    pub add_remote: AddRemoteForm,
    pub branches: Vec<RemoteBranch>,
    pub branch_list: SearchableList,
    /// The branch list is being (re)loaded; not a mutating operation
    pub loading_branches: bool,
}

impl AppState {
    /// Fresh session. With two remotes the caller is expected to start a fetch at once.
    pub fn new(remote_a: Remote, remote_b: Option<Remote>, branch: impl Into<String>) -> Self {
        let two = remote_b.is_some();
        Self {
            remote_a,
            remote_b,
            branch: branch.into(),
            comparison: None,
            mode: Mode::Normal,
            loading: two,
            message: (!two).then(|| "Press 'a' to add a second remote.".to_string()),
            focus: Pane::A,
            selected_a: 0,
            selected_b: 0,
            add_remote: AddRemoteForm::default(),
            branches: Vec::new(),
            branch_list: SearchableList::new(0),
            loading_branches: false,
        }
    }

    pub fn has_two_remotes(&self) -> bool {
        self.remote_b.is_some()
    }

    /// `(a, b)` remote names when both are configured
    pub fn remote_names(&self) -> Option<(&str, &str)> {
        self.remote_b
            .as_ref()
            .map(|b| (self.remote_a.name.as_str(), b.name.as_str()))
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Unique commits listed for a pane (empty before the first comparison)
    pub fn pane_commits(&self, pane: Pane) -> &[Commit] {
        match (&self.comparison, pane) {
            (Some(c), Pane::A) => &c.unique_a,
            (Some(c), Pane::B) => &c.unique_b,
            (None, _) => &[],
        }
    }

    pub fn pane_selection(&self, pane: Pane) -> usize {
        match pane {
            Pane::A => self.selected_a,
            Pane::B => self.selected_b,
        }
    }

    pub fn selected_commit(&self) -> Option<&Commit> {
        self.pane_commits(self.focus)
            .get(self.pane_selection(self.focus))
    }

    /// Move within the focused pane, clamped to its list
    pub fn move_commit_selection(&mut self, delta: i32) {
        let len = self.pane_commits(self.focus).len();
        let current = self.pane_selection(self.focus);
        let step = delta.unsigned_abs() as usize;
        let next = if len == 0 {
            0
        } else if delta > 0 {
            current.saturating_add(step).min(len - 1)
        } else {
            current.saturating_sub(step)
        };
        match self.focus {
            Pane::A => self.selected_a = next,
            Pane::B => self.selected_b = next,
        }
    }

    /// Install a new comparison, replacing the previous one wholesale
    pub fn set_comparison(&mut self, result: ComparisonResult) {
        self.comparison = Some(result);
        self.selected_a = 0;
        self.selected_b = 0;
    }

    /// Branch under the selector's highlight
    pub fn selected_branch(&self) -> Option<&RemoteBranch> {
        self.branch_list
            .selected_index()
            .and_then(|idx| self.branches.get(idx))
    }

    /// Change the target branch. Comparison data belongs to the old branch and is dropped.
    pub fn switch_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
        self.comparison = None;
        self.selected_a = 0;
        self.selected_b = 0;
    }

    /// Forget any half-typed add-remote input
    pub fn reset_add_remote_form(&mut self) {
        self.add_remote = AddRemoteForm::default();
    }
}
