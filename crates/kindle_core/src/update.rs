use crate::config::{resolve_server_url, DEFAULT_SERVER_URL};
use crate::effect::{PopupEffect, SettingsEffect, INDICATOR_DURATION};
use crate::msg::{PopupMsg, Reply, SettingsMsg};
use crate::state::{ConnectionResult, PopupAction, PopupState, ServerStatus, SettingsState};
use crate::view_model::{StatusLine, StatusTone};

const CONNECTION_FAILED: &str = "Failed to connect to server";

/// Pure popup update: applies a message to state and returns any effects.
pub fn update_popup(mut state: PopupState, msg: PopupMsg) -> (PopupState, Vec<PopupEffect>) {
    let effects = match msg {
        PopupMsg::Opened => vec![PopupEffect::LoadServerUrl],
        PopupMsg::ServerUrlLoaded(stored) => {
            state.set_server_url(stored.as_deref());
            vec![PopupEffect::QueryActiveTab]
        }
        PopupMsg::TabResolved(tab) => {
            state.set_tab(tab);
            vec![PopupEffect::CheckHealth {
                server_url: state.server_url().to_string(),
            }]
        }
        PopupMsg::HealthChecked(reply) => {
            // Reachable but misconfigured still counts as online; the
            // settings page reports configuration.
            let status = if reply.is_ok() {
                ServerStatus::Online
            } else {
                ServerStatus::Offline
            };
            state.set_server_status(status);
            vec![refresh_queue(&state)]
        }
        PopupMsg::QueueCounted(reply) => {
            if let Reply::Ok(count) = reply {
                state.set_queue_count(count);
            }
            Vec::new()
        }
        PopupMsg::SendClicked => match start_tab_action(&mut state, PopupAction::Send) {
            Some(url) => vec![PopupEffect::SendArticle {
                server_url: state.server_url().to_string(),
                url,
            }],
            None => Vec::new(),
        },
        PopupMsg::ArticleSent(reply) => {
            if state.action(PopupAction::Send).is_pending() {
                let ok = reply.is_ok();
                let line = match reply {
                    Reply::Ok(title) => success(format!("Sent: {title}")),
                    other => failure_line(other),
                };
                state.finish(PopupAction::Send, ok, line);
            }
            Vec::new()
        }
        PopupMsg::EnqueueClicked => match start_tab_action(&mut state, PopupAction::Enqueue) {
            Some(url) => vec![PopupEffect::EnqueueArticle {
                server_url: state.server_url().to_string(),
                url,
            }],
            None => Vec::new(),
        },
        PopupMsg::ArticleQueued(reply) => {
            if !state.action(PopupAction::Enqueue).is_pending() {
                return (state, Vec::new());
            }
            match reply {
                Reply::Ok(queue_length) => {
                    let text = match queue_length {
                        Some(length) => {
                            state.set_queue_count(length);
                            format!("Added to queue ({length} in queue)")
                        }
                        None => "Added to queue".to_string(),
                    };
                    state.finish(PopupAction::Enqueue, true, success(text));
                    vec![refresh_queue(&state)]
                }
                other => {
                    state.finish(PopupAction::Enqueue, false, failure_line(other));
                    Vec::new()
                }
            }
        }
        PopupMsg::SendQueueClicked => {
            if state.is_enabled(PopupAction::SendQueue) {
                state.begin(PopupAction::SendQueue, "Sending queue...");
                vec![PopupEffect::SendQueue {
                    server_url: state.server_url().to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        PopupMsg::QueueSent(reply) => {
            if !state.action(PopupAction::SendQueue).is_pending() {
                return (state, Vec::new());
            }
            let reached = reply.reached_server();
            match reply {
                Reply::Ok(results) => {
                    let sent = results.iter().filter(|item| item.success).count();
                    let total = results.len();
                    state.finish(
                        PopupAction::SendQueue,
                        true,
                        success(format!("Sent {sent} of {total} articles")),
                    );
                }
                other => state.finish(PopupAction::SendQueue, false, failure_line(other)),
            }
            if reached {
                vec![refresh_queue(&state)]
            } else {
                Vec::new()
            }
        }
        PopupMsg::ClearQueueClicked => {
            if state.is_enabled(PopupAction::ClearQueue) {
                state.begin(PopupAction::ClearQueue, "Clearing queue...");
                vec![PopupEffect::ClearQueue {
                    server_url: state.server_url().to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        PopupMsg::QueueCleared(reply) => {
            if !state.action(PopupAction::ClearQueue).is_pending() {
                return (state, Vec::new());
            }
            match reply {
                Reply::Ok(()) => {
                    state.set_queue_count(0);
                    state.finish(PopupAction::ClearQueue, true, success("Queue cleared"));
                    vec![refresh_queue(&state)]
                }
                other => {
                    state.finish(PopupAction::ClearQueue, false, failure_line(other));
                    Vec::new()
                }
            }
        }
        PopupMsg::PreviewClicked => match start_tab_action(&mut state, PopupAction::Preview) {
            Some(url) => vec![PopupEffect::PreviewArticle {
                server_url: state.server_url().to_string(),
                url,
            }],
            None => Vec::new(),
        },
        PopupMsg::ArticlePreviewed(reply) => {
            if state.action(PopupAction::Preview).is_pending() {
                let ok = reply.is_ok();
                let line = match reply {
                    Reply::Ok(summary) => success(format!(
                        "Preview: {} ({} words)",
                        summary.title, summary.word_count
                    )),
                    other => failure_line(other),
                };
                state.finish(PopupAction::Preview, ok, line);
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Pure settings update: applies a message to state and returns any effects.
pub fn update_settings(
    mut state: SettingsState,
    msg: SettingsMsg,
) -> (SettingsState, Vec<SettingsEffect>) {
    let effects = match msg {
        SettingsMsg::Opened => vec![SettingsEffect::LoadServerUrl],
        SettingsMsg::ServerUrlLoaded(stored) => {
            state.set_input(resolve_server_url(stored.as_deref()));
            Vec::new()
        }
        SettingsMsg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        SettingsMsg::SaveClicked => {
            let value = resolve_server_url(Some(state.input()));
            state.set_input(value.clone());
            vec![SettingsEffect::StoreServerUrl(value)]
        }
        SettingsMsg::ResetClicked => {
            state.set_input(DEFAULT_SERVER_URL);
            vec![SettingsEffect::StoreServerUrl(DEFAULT_SERVER_URL.to_string())]
        }
        SettingsMsg::Stored => {
            let generation = state.show_indicator();
            vec![SettingsEffect::ScheduleIndicatorReset {
                generation,
                after: INDICATOR_DURATION,
            }]
        }
        SettingsMsg::StoreFailed(message) => {
            state.set_store_error(message);
            Vec::new()
        }
        SettingsMsg::IndicatorExpired { generation } => {
            state.expire_indicator(generation);
            Vec::new()
        }
        SettingsMsg::TestClicked => {
            if state.test_state().is_pending() {
                Vec::new()
            } else {
                state.begin_test();
                vec![SettingsEffect::CheckConnection {
                    server_url: resolve_server_url(Some(state.input())),
                }]
            }
        }
        SettingsMsg::ConnectionTested(reply) => {
            if state.test_state().is_pending() {
                let result = match reply {
                    Reply::Ok(report) => ConnectionResult::Checked(report),
                    Reply::Rejected(reason) => ConnectionResult::Failed(reason),
                    Reply::Unreachable(detail) => {
                        ConnectionResult::Failed(format!("Cannot reach server: {detail}"))
                    }
                };
                state.finish_test(result);
            }
            Vec::new()
        }
    };

    (state, effects)
}

/// Marks a tab-bound action pending and returns the tab URL, or `None` when
/// the button is disabled.
fn start_tab_action(state: &mut PopupState, action: PopupAction) -> Option<String> {
    if !state.is_enabled(action) {
        return None;
    }
    let url = state.tab()?.url.clone();
    let label = match action {
        PopupAction::Send => "Sending to Kindle...",
        PopupAction::Enqueue => "Adding to queue...",
        PopupAction::Preview => "Extracting article...",
        PopupAction::SendQueue | PopupAction::ClearQueue => return None,
    };
    state.begin(action, label);
    Some(url)
}

fn refresh_queue(state: &PopupState) -> PopupEffect {
    PopupEffect::FetchQueueCount {
        server_url: state.server_url().to_string(),
    }
}

fn success(text: impl Into<String>) -> StatusLine {
    StatusLine::new(StatusTone::Success, text)
}

fn failure_line<T>(reply: Reply<T>) -> StatusLine {
    let text = match reply {
        Reply::Rejected(error) => error,
        Reply::Unreachable(_) | Reply::Ok(_) => CONNECTION_FAILED.to_string(),
    };
    StatusLine::new(StatusTone::Error, text)
}
