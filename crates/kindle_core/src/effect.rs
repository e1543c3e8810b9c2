use std::time::Duration;

/// How long the settings page shows its "saved" indicator.
pub const INDICATOR_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupEffect {
    LoadServerUrl,
    QueryActiveTab,
    CheckHealth { server_url: String },
    FetchQueueCount { server_url: String },
    SendArticle { server_url: String, url: String },
    EnqueueArticle { server_url: String, url: String },
    SendQueue { server_url: String },
    ClearQueue { server_url: String },
    PreviewArticle { server_url: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEffect {
    LoadServerUrl,
    StoreServerUrl(String),
    ScheduleIndicatorReset { generation: u64, after: Duration },
    CheckConnection { server_url: String },
}
