/// Every user interaction produces an Action. UI never directly calls git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    /// Close the current overlay (or leave search) without applying anything
    GoBack,

    // Main view
    Fetch,
    RequestSync,
    ConfirmSync,
    ToggleFocus,
    MoveSelection(i32),
    MoveTop,
    MoveBottom,

    // Add remote form
    OpenAddRemote,
    FormNextField,
    FormPrevField,
    FormSubmit,

    // Branch selector
    OpenBranchSelector,
    SwitchBranch,
    ReloadBranches,
    StartSearch,
    /// Leave search, keeping the query as a filter
    ExitSearch,
    RequestCreateBranch,
    ConfirmCreateBranch,
    ShowBranchInfo,

    // Text editing (search query or focused form field)
    SearchPush(char),
    SearchPop,
    SearchDeleteWord,
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
}
