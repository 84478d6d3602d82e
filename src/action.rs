#[derive(Debug, Clone, PartialEq)]
pub enum Direction {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Direction),
    Refresh,
    Clear,
    BeginSave,
    UpdateSavePath(String),
    ConfirmSave,
    CancelSave,
    ToggleHelp,
    None,
}
