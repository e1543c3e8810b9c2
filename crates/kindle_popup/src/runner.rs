//! Executes controller effects against the server and the settings store,
//! feeding each result back into the controller as a message.

use std::collections::VecDeque;
use std::sync::Arc;

use kindle_core::{
    update_popup, update_settings, BatchItem, HealthReport, PopupEffect, PopupMsg, PopupState,
    PreviewSummary, Reply, SettingsEffect, SettingsMsg, SettingsState, TabSnapshot,
};
use kindle_engine::{ApiReply, ClientError, ServerClient, SettingsStore, UNTITLED};
use kindle_logging::{kindle_debug, kindle_error, kindle_warn};
use tokio::sync::mpsc;

pub struct EffectRunner {
    client: Arc<dyn ServerClient>,
    store: Arc<dyn SettingsStore>,
    /// What the active-tab query answers.
    tab: Option<TabSnapshot>,
    deferred_tx: mpsc::UnboundedSender<SettingsMsg>,
    deferred_rx: mpsc::UnboundedReceiver<SettingsMsg>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn ServerClient>,
        store: Arc<dyn SettingsStore>,
        tab: Option<TabSnapshot>,
    ) -> Self {
        let (deferred_tx, deferred_rx) = mpsc::unbounded_channel();
        Self {
            client,
            store,
            tab,
            deferred_tx,
            deferred_rx,
        }
    }

    /// Feeds `msgs` to the popup controller one by one. Effects run one at a
    /// time in emission order and their results are processed before the
    /// next input message.
    pub async fn run_popup(&self, mut state: PopupState, msgs: Vec<PopupMsg>) -> PopupState {
        let mut inbox: VecDeque<PopupMsg> = msgs.into();
        while let Some(msg) = inbox.pop_front() {
            kindle_debug!("popup <- {:?}", msg);
            let (next, effects) = update_popup(state, msg);
            state = next;
            if state.consume_dirty() {
                kindle_debug!("popup view {:?}", state.view().status);
            }
            // Results jump ahead of the remaining input, as a user would
            // only click after the popup has settled.
            let mut replies = Vec::with_capacity(effects.len());
            for effect in effects {
                replies.push(self.execute_popup(effect).await);
            }
            for reply in replies.into_iter().rev() {
                inbox.push_front(reply);
            }
        }
        state
    }

    /// Settings counterpart of [`EffectRunner::run_popup`]. Indicator resets
    /// that fired since the last call are applied first; pending ones are
    /// dropped with the runner.
    pub async fn run_settings(
        &mut self,
        mut state: SettingsState,
        msgs: Vec<SettingsMsg>,
    ) -> SettingsState {
        let mut inbox: VecDeque<SettingsMsg> = VecDeque::new();
        while let Ok(expired) = self.deferred_rx.try_recv() {
            inbox.push_back(expired);
        }
        inbox.extend(msgs);

        while let Some(msg) = inbox.pop_front() {
            kindle_debug!("settings <- {:?}", msg);
            let (next, effects) = update_settings(state, msg);
            state = next;
            state.consume_dirty();
            let mut replies = Vec::new();
            for effect in effects {
                if let Some(reply) = self.execute_settings(effect).await {
                    replies.push(reply);
                }
            }
            for reply in replies.into_iter().rev() {
                inbox.push_front(reply);
            }
        }
        state
    }

    async fn execute_popup(&self, effect: PopupEffect) -> PopupMsg {
        match effect {
            PopupEffect::LoadServerUrl => PopupMsg::ServerUrlLoaded(self.load_server_url()),
            PopupEffect::QueryActiveTab => PopupMsg::TabResolved(self.tab.clone()),
            PopupEffect::CheckHealth { server_url } => {
                let reply = match self.client.ping(&server_url).await {
                    Ok(()) => Reply::Ok(()),
                    Err(err) => failed(err),
                };
                PopupMsg::HealthChecked(reply)
            }
            PopupEffect::FetchQueueCount { server_url } => {
                let reply = match self.client.queue_count(&server_url).await {
                    Ok(count) => Reply::Ok(u32::try_from(count).unwrap_or(u32::MAX)),
                    Err(err) => {
                        kindle_error!("Failed to update queue info: {}", err);
                        failed(err)
                    }
                };
                PopupMsg::QueueCounted(reply)
            }
            PopupEffect::SendArticle { server_url, url } => {
                let reply = self.client.send(&server_url, &url).await;
                PopupMsg::ArticleSent(answer(reply, |sent| {
                    sent.title.unwrap_or_else(|| self.fallback_title(&url))
                }))
            }
            PopupEffect::EnqueueArticle { server_url, url } => {
                let reply = self.client.enqueue(&server_url, &url).await;
                PopupMsg::ArticleQueued(answer(reply, |added| {
                    added
                        .queue_length
                        .map(|length| u32::try_from(length).unwrap_or(u32::MAX))
                }))
            }
            PopupEffect::SendQueue { server_url } => {
                let reply = self.client.send_queue(&server_url).await;
                PopupMsg::QueueSent(answer(reply, |batch| {
                    batch
                        .results
                        .into_iter()
                        .map(|item| BatchItem {
                            success: item.success,
                            title: item.title,
                        })
                        .collect()
                }))
            }
            PopupEffect::ClearQueue { server_url } => {
                let reply = self.client.clear_queue(&server_url).await;
                PopupMsg::QueueCleared(answer(reply, |_| ()))
            }
            PopupEffect::PreviewArticle { server_url, url } => {
                let reply = self.client.preview(&server_url, &url).await;
                PopupMsg::ArticlePreviewed(answer(reply, |preview| PreviewSummary {
                    word_count: preview.text.split_whitespace().count(),
                    title: preview.title,
                }))
            }
        }
    }

    async fn execute_settings(&self, effect: SettingsEffect) -> Option<SettingsMsg> {
        match effect {
            SettingsEffect::LoadServerUrl => {
                Some(SettingsMsg::ServerUrlLoaded(self.load_server_url()))
            }
            SettingsEffect::StoreServerUrl(server_url) => {
                Some(match self.store.store_server_url(&server_url) {
                    Ok(()) => SettingsMsg::Stored,
                    Err(err) => {
                        kindle_error!("Failed to save settings: {}", err);
                        SettingsMsg::StoreFailed(format!("Could not save settings: {err}"))
                    }
                })
            }
            SettingsEffect::ScheduleIndicatorReset { generation, after } => {
                let tx = self.deferred_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(SettingsMsg::IndicatorExpired { generation });
                });
                None
            }
            SettingsEffect::CheckConnection { server_url } => Some(SettingsMsg::ConnectionTested(
                self.check_health(&server_url).await,
            )),
        }
    }

    /// A store that cannot be read behaves like an empty one.
    fn load_server_url(&self) -> Option<String> {
        self.store.load_server_url().unwrap_or_else(|err| {
            kindle_warn!("Ignoring unreadable settings: {}", err);
            None
        })
    }

    /// Title shown when the server confirms a send without naming it.
    fn fallback_title(&self, url: &str) -> String {
        self.tab
            .as_ref()
            .filter(|tab| tab.url == url && !tab.title.trim().is_empty())
            .map(|tab| tab.title.clone())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    async fn check_health(&self, server_url: &str) -> Reply<HealthReport> {
        match self.client.health(server_url).await {
            Ok(health) => Reply::Ok(HealthReport {
                kindle_configured: health.kindle_configured,
                smtp_configured: health.smtp_configured,
            }),
            Err(err) => failed(err),
        }
    }
}

fn failed<T>(err: ClientError) -> Reply<T> {
    match err {
        ClientError::Transport(detail) => Reply::Unreachable(detail),
        other => Reply::Rejected(other.to_string()),
    }
}

fn answer<B, T>(result: Result<ApiReply<B>, ClientError>, accept: impl FnOnce(B) -> T) -> Reply<T> {
    match result {
        Ok(ApiReply::Accepted(body)) => Reply::Ok(accept(body)),
        Ok(ApiReply::Refused(error)) => Reply::Rejected(error),
        Err(err) => failed(err),
    }
}
