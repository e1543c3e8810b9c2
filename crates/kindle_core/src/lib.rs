//! Kindle Sender core: pure popup and settings state machines.
//!
//! Nothing in here performs IO. Update functions return effects; a runner
//! executes them and feeds results back as messages.
mod config;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use config::{endpoint, resolve_server_url, DEFAULT_SERVER_URL};
pub use effect::{PopupEffect, SettingsEffect, INDICATOR_DURATION};
pub use msg::{
    BatchItem, HealthReport, PopupMsg, PreviewSummary, Reply, SettingsMsg, TabSnapshot,
};
pub use state::{ActionState, PopupAction, PopupState, ServerStatus, SettingsState};
pub use update::{update_popup, update_settings};
pub use view_model::{ButtonView, PopupViewModel, SettingsViewModel, StatusLine, StatusTone};
