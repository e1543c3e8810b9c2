use crate::config::{resolve_server_url, DEFAULT_SERVER_URL};
use crate::msg::{HealthReport, TabSnapshot};
use crate::view_model::{
    ButtonView, PopupViewModel, SettingsViewModel, StatusLine, StatusTone,
};

/// Lifecycle of one user action: `Idle -> Pending -> Succeeded | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl ActionState {
    pub fn is_pending(self) -> bool {
        self == ActionState::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PopupAction {
    Send,
    Enqueue,
    SendQueue,
    ClearQueue,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct PopupActions {
    send: ActionState,
    enqueue: ActionState,
    send_queue: ActionState,
    clear_queue: ActionState,
    preview: ActionState,
}

impl PopupActions {
    fn get(&self, action: PopupAction) -> ActionState {
        match action {
            PopupAction::Send => self.send,
            PopupAction::Enqueue => self.enqueue,
            PopupAction::SendQueue => self.send_queue,
            PopupAction::ClearQueue => self.clear_queue,
            PopupAction::Preview => self.preview,
        }
    }

    fn slot(&mut self, action: PopupAction) -> &mut ActionState {
        match action {
            PopupAction::Send => &mut self.send,
            PopupAction::Enqueue => &mut self.enqueue,
            PopupAction::SendQueue => &mut self.send_queue,
            PopupAction::ClearQueue => &mut self.clear_queue,
            PopupAction::Preview => &mut self.preview,
        }
    }
}

/// State of the popup view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    server_url: String,
    tab: Option<TabSnapshot>,
    server: ServerStatus,
    queue_count: u32,
    actions: PopupActions,
    status: Option<StatusLine>,
    dirty: bool,
}

impl Default for PopupState {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            tab: None,
            server: ServerStatus::Checking,
            queue_count: 0,
            actions: PopupActions::default(),
            status: None,
            dirty: false,
        }
    }
}

impl PopupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PopupViewModel {
        PopupViewModel {
            server_url: self.server_url.clone(),
            tab: self.tab.clone(),
            server: self.server,
            queue_badge: (self.queue_count > 0).then_some(self.queue_count),
            send: self.button(PopupAction::Send),
            enqueue: self.button(PopupAction::Enqueue),
            send_queue: self.button(PopupAction::SendQueue),
            clear_queue: self.button(PopupAction::ClearQueue),
            preview: self.button(PopupAction::Preview),
            status: self.status.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn tab(&self) -> Option<&TabSnapshot> {
        self.tab.as_ref()
    }

    pub fn action(&self, action: PopupAction) -> ActionState {
        self.actions.get(action)
    }

    /// Whether the button for `action` accepts a click right now.
    pub fn is_enabled(&self, action: PopupAction) -> bool {
        if self.actions.get(action).is_pending() {
            return false;
        }
        match action {
            PopupAction::Send | PopupAction::Enqueue | PopupAction::Preview => {
                self.server == ServerStatus::Online && self.tab.is_some()
            }
            PopupAction::SendQueue | PopupAction::ClearQueue => true,
        }
    }

    fn button(&self, action: PopupAction) -> ButtonView {
        ButtonView {
            enabled: self.is_enabled(action),
            state: self.actions.get(action),
        }
    }

    pub(crate) fn set_server_url(&mut self, stored: Option<&str>) {
        self.server_url = resolve_server_url(stored);
        self.dirty = true;
    }

    pub(crate) fn set_tab(&mut self, tab: Option<TabSnapshot>) {
        self.tab = tab;
        self.dirty = true;
    }

    pub(crate) fn set_server_status(&mut self, status: ServerStatus) {
        self.server = status;
        self.dirty = true;
    }

    pub(crate) fn set_queue_count(&mut self, count: u32) {
        if self.queue_count != count {
            self.queue_count = count;
            self.dirty = true;
        }
    }

    pub(crate) fn begin(&mut self, action: PopupAction, status: &str) {
        *self.actions.slot(action) = ActionState::Pending;
        self.status = Some(StatusLine::new(StatusTone::Loading, status));
        self.dirty = true;
    }

    pub(crate) fn finish(&mut self, action: PopupAction, ok: bool, status: StatusLine) {
        *self.actions.slot(action) = if ok {
            ActionState::Succeeded
        } else {
            ActionState::Failed
        };
        self.status = Some(status);
        self.dirty = true;
    }
}

/// Outcome of the last connection test on the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConnectionResult {
    Checked(HealthReport),
    Failed(String),
}

/// State of the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    input: String,
    indicator_generation: u64,
    indicator_visible: bool,
    store_error: Option<String>,
    test: ActionState,
    connection: Option<ConnectionResult>,
    dirty: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            input: DEFAULT_SERVER_URL.to_string(),
            indicator_generation: 0,
            indicator_visible: false,
            store_error: None,
            test: ActionState::Idle,
            connection: None,
            dirty: false,
        }
    }
}

impl SettingsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SettingsViewModel {
        let mut connection_lines = Vec::new();
        if self.test.is_pending() {
            connection_lines.push(StatusLine::new(StatusTone::Loading, "Testing connection..."));
        }
        match &self.connection {
            Some(ConnectionResult::Checked(report)) if !self.test.is_pending() => {
                connection_lines.push(flag_line(
                    report.kindle_configured,
                    "Kindle email configured",
                    "Kindle email not configured",
                ));
                connection_lines.push(flag_line(
                    report.smtp_configured,
                    "SMTP configured",
                    "SMTP not configured",
                ));
            }
            Some(ConnectionResult::Failed(message)) if !self.test.is_pending() => {
                connection_lines.push(StatusLine::new(StatusTone::Error, message));
            }
            _ => {}
        }

        SettingsViewModel {
            input: self.input.clone(),
            saved_indicator: self.indicator_visible,
            store_error: self.store_error.clone(),
            test_button_enabled: !self.test.is_pending(),
            test: self.test,
            connection_lines,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn test_state(&self) -> ActionState {
        self.test
    }

    pub(crate) fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
        self.dirty = true;
    }

    pub(crate) fn show_indicator(&mut self) -> u64 {
        self.indicator_generation += 1;
        self.indicator_visible = true;
        self.store_error = None;
        self.dirty = true;
        self.indicator_generation
    }

    pub(crate) fn expire_indicator(&mut self, generation: u64) {
        if generation == self.indicator_generation && self.indicator_visible {
            self.indicator_visible = false;
            self.dirty = true;
        }
    }

    pub(crate) fn set_store_error(&mut self, message: String) {
        self.indicator_visible = false;
        self.store_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn begin_test(&mut self) {
        self.test = ActionState::Pending;
        self.dirty = true;
    }

    pub(crate) fn finish_test(&mut self, result: ConnectionResult) {
        self.test = match result {
            ConnectionResult::Checked(_) => ActionState::Succeeded,
            ConnectionResult::Failed(_) => ActionState::Failed,
        };
        self.connection = Some(result);
        self.dirty = true;
    }
}

fn flag_line(ok: bool, ok_text: &str, failed_text: &str) -> StatusLine {
    if ok {
        StatusLine::new(StatusTone::Success, ok_text)
    } else {
        StatusLine::new(StatusTone::Error, failed_text)
    }
}
