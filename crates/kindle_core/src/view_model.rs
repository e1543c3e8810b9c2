use crate::msg::TabSnapshot;
use crate::state::{ActionState, ServerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Loading,
    Success,
    Error,
}

/// One rendered line of status text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusLine {
    pub fn new(tone: StatusTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub enabled: bool,
    pub state: ActionState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupViewModel {
    pub server_url: String,
    pub tab: Option<TabSnapshot>,
    pub server: ServerStatus,
    /// Queue length, only when positive.
    pub queue_badge: Option<u32>,
    pub send: ButtonView,
    pub enqueue: ButtonView,
    pub send_queue: ButtonView,
    pub clear_queue: ButtonView,
    pub preview: ButtonView,
    pub status: Option<StatusLine>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsViewModel {
    pub input: String,
    pub saved_indicator: bool,
    pub store_error: Option<String>,
    pub test_button_enabled: bool,
    pub test: ActionState,
    pub connection_lines: Vec<StatusLine>,
    pub dirty: bool,
}
