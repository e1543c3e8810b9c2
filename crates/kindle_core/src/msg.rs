/// Title and URL of the active browser tab at the moment it was queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSnapshot {
    pub title: String,
    pub url: String,
}

/// Configuration flags reported by the server's health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthReport {
    pub kindle_configured: bool,
    pub smtp_configured: bool,
}

/// One entry of a batch send result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub success: bool,
    pub title: Option<String>,
}

/// Short description of an extracted article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSummary {
    pub title: String,
    pub word_count: usize,
}

/// Result of a call to the server, as seen by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// The server handled the request.
    Ok(T),
    /// The server answered but refused (`success: false` or a non-2xx status).
    Rejected(String),
    /// The request never got an answer (connection refused, timeout...).
    Unreachable(String),
}

impl<T> Reply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    /// True when the server produced an answer, whatever it was.
    pub fn reached_server(&self) -> bool {
        !matches!(self, Reply::Unreachable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMsg {
    /// Popup was opened; starts the initialization chain.
    Opened,
    /// Stored server URL, if any.
    ServerUrlLoaded(Option<String>),
    /// Active tab lookup finished.
    TabResolved(Option<TabSnapshot>),
    /// Liveness probe finished; any 2xx answer counts.
    HealthChecked(Reply<()>),
    /// Queue length probe finished.
    QueueCounted(Reply<u32>),
    /// User clicked "Send to Kindle".
    SendClicked,
    /// Send finished; carries the article title.
    ArticleSent(Reply<String>),
    /// User clicked "Add to queue".
    EnqueueClicked,
    /// Enqueue finished; carries the new queue length when the server
    /// reports one.
    ArticleQueued(Reply<Option<u32>>),
    /// User clicked "Send queue".
    SendQueueClicked,
    /// Batch send finished.
    QueueSent(Reply<Vec<BatchItem>>),
    /// User clicked "Clear queue".
    ClearQueueClicked,
    QueueCleared(Reply<()>),
    /// User asked for a preview of the current tab.
    PreviewClicked,
    ArticlePreviewed(Reply<PreviewSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsMsg {
    /// Settings page was opened.
    Opened,
    /// Stored server URL, if any.
    ServerUrlLoaded(Option<String>),
    /// User edited the URL input.
    InputChanged(String),
    SaveClicked,
    ResetClicked,
    /// Storage write finished.
    Stored,
    /// Storage write failed.
    StoreFailed(String),
    /// A scheduled indicator reset fired.
    IndicatorExpired { generation: u64 },
    TestClicked,
    ConnectionTested(Reply<HealthReport>),
}
