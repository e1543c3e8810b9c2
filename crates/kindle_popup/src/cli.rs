use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use kindle_core::{PopupAction, PopupMsg, SettingsMsg, TabSnapshot};

#[derive(Debug, Parser)]
#[command(
    name = "kindle-popup",
    version,
    about = "Send the article you are reading to a Kindle through a Kindle Sender server"
)]
pub struct Cli {
    /// Give up on a server call after this many seconds.
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,
    /// Settings file; defaults to the user config directory.
    #[arg(long)]
    pub settings_file: Option<PathBuf>,
    /// Write logs to this file instead of the terminal.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(short, long)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show server status, current page and queue size.
    Status(OptionalPage),
    /// Send a page to the Kindle now.
    Send(Page),
    #[command(subcommand)]
    Queue(QueueCommand),
    /// Show what the server extracts from a page.
    Preview(Page),
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Add a page to the server queue.
    Add(Page),
    /// Send every queued page.
    Send,
    /// Empty the queue.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    /// Store the server URL; no value stores the default.
    Save { url: Option<String> },
    Reset,
    /// Check a server URL, the stored one when omitted.
    Test { url: Option<String> },
}

/// The page the popup acts on, standing in for the active browser tab.
#[derive(Debug, Args)]
pub struct Page {
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct OptionalPage {
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
}

/// Messages a command feeds to one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    Popup {
        tab: Option<TabSnapshot>,
        msgs: Vec<PopupMsg>,
        /// The action whose outcome decides the exit status.
        action: Option<PopupAction>,
    },
    Settings {
        msgs: Vec<SettingsMsg>,
    },
}

impl Command {
    pub fn plan(self) -> Plan {
        match self {
            Command::Status(page) => popup(tab(page.url, page.title), None),
            Command::Send(page) => popup(
                tab(Some(page.url), page.title),
                Some((PopupMsg::SendClicked, PopupAction::Send)),
            ),
            Command::Queue(QueueCommand::Add(page)) => popup(
                tab(Some(page.url), page.title),
                Some((PopupMsg::EnqueueClicked, PopupAction::Enqueue)),
            ),
            Command::Queue(QueueCommand::Send) => popup(
                None,
                Some((PopupMsg::SendQueueClicked, PopupAction::SendQueue)),
            ),
            Command::Queue(QueueCommand::Clear) => popup(
                None,
                Some((PopupMsg::ClearQueueClicked, PopupAction::ClearQueue)),
            ),
            Command::Preview(page) => popup(
                tab(Some(page.url), page.title),
                Some((PopupMsg::PreviewClicked, PopupAction::Preview)),
            ),
            Command::Settings(command) => {
                let mut msgs = vec![SettingsMsg::Opened];
                match command {
                    SettingsCommand::Show => {}
                    SettingsCommand::Save { url } => {
                        msgs.push(SettingsMsg::InputChanged(url.unwrap_or_default()));
                        msgs.push(SettingsMsg::SaveClicked);
                    }
                    SettingsCommand::Reset => msgs.push(SettingsMsg::ResetClicked),
                    SettingsCommand::Test { url } => {
                        if let Some(url) = url {
                            msgs.push(SettingsMsg::InputChanged(url));
                        }
                        msgs.push(SettingsMsg::TestClicked);
                    }
                }
                Plan::Settings { msgs }
            }
        }
    }
}

fn popup(tab: Option<TabSnapshot>, click: Option<(PopupMsg, PopupAction)>) -> Plan {
    let mut msgs = vec![PopupMsg::Opened];
    let action = click.map(|(msg, action)| {
        msgs.push(msg);
        action
    });
    Plan::Popup { tab, msgs, action }
}

fn tab(url: Option<String>, title: Option<String>) -> Option<TabSnapshot> {
    let url = url?;
    Some(TabSnapshot {
        title: title.unwrap_or_else(|| url.clone()),
        url,
    })
}
