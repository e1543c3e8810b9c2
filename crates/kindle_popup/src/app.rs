use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use kindle_core::{ActionState, PopupState, ServerStatus, SettingsState};
use kindle_engine::{
    default_settings_path, ClientSettings, FileSettingsStore, ReqwestServerClient,
    ServerClient, SettingsStore,
};
use kindle_logging::kindle_info;

use crate::cli::{Cli, Plan};
use crate::render::{render_popup, render_settings};
use crate::runner::EffectRunner;

/// Rendered lines plus whether the command achieved what it asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub success: bool,
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings_path = match cli.settings_file {
        Some(path) => path,
        None => default_settings_path()
            .context("no config directory on this platform; pass --settings-file")?,
    };
    let client = ReqwestServerClient::new(ClientSettings {
        request_timeout: Duration::from_secs(cli.timeout_secs),
        ..ClientSettings::default()
    })?;
    kindle_info!("Using settings at {}", settings_path.display());

    let outcome = execute(
        Arc::new(client),
        Arc::new(FileSettingsStore::new(settings_path)),
        cli.command.plan(),
    )
    .await;

    for line in &outcome.lines {
        println!("{line}");
    }
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Runs one plan to completion against the given collaborators.
pub async fn execute(
    client: Arc<dyn ServerClient>,
    store: Arc<dyn SettingsStore>,
    plan: Plan,
) -> Outcome {
    match plan {
        Plan::Popup { tab, msgs, action } => {
            let runner = EffectRunner::new(client, store, tab);
            let state = runner.run_popup(PopupState::new(), msgs).await;
            let success = match action {
                Some(action) => state.action(action) == ActionState::Succeeded,
                None => state.view().server == ServerStatus::Online,
            };
            Outcome {
                lines: render_popup(&state.view()),
                success,
            }
        }
        Plan::Settings { msgs } => {
            let mut runner = EffectRunner::new(client, store, None);
            let state = runner.run_settings(SettingsState::new(), msgs).await;
            let view = state.view();
            let success = view.store_error.is_none() && view.test != ActionState::Failed;
            Outcome {
                lines: render_settings(&view),
                success,
            }
        }
    }
}
