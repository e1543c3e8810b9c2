use std::sync::Once;

use kindle_core::{
    update_popup, PopupEffect, PopupMsg, PopupState, Reply, ServerStatus,
    TabSnapshot, DEFAULT_SERVER_URL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(kindle_logging::initialize_for_tests);
}

fn tab() -> TabSnapshot {
    TabSnapshot {
        title: "An article".to_string(),
        url: "https://example.com/post".to_string(),
    }
}

#[test]
fn initialization_runs_tab_then_health_then_queue() {
    init_logging();
    let state = PopupState::new();

    let (state, effects) = update_popup(state, PopupMsg::Opened);
    assert_eq!(effects, vec![PopupEffect::LoadServerUrl]);

    let (state, effects) = update_popup(state, PopupMsg::ServerUrlLoaded(None));
    assert_eq!(effects, vec![PopupEffect::QueryActiveTab]);

    let (state, effects) = update_popup(state, PopupMsg::TabResolved(Some(tab())));
    assert_eq!(
        effects,
        vec![PopupEffect::CheckHealth {
            server_url: DEFAULT_SERVER_URL.to_string()
        }]
    );

    let (state, effects) = update_popup(
        state,
        PopupMsg::HealthChecked(Reply::Ok(())),
    );
    assert_eq!(
        effects,
        vec![PopupEffect::FetchQueueCount {
            server_url: DEFAULT_SERVER_URL.to_string()
        }]
    );

    let (mut state, effects) = update_popup(state, PopupMsg::QueueCounted(Reply::Ok(2)));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.server, ServerStatus::Online);
    assert_eq!(view.queue_badge, Some(2));
    assert_eq!(view.tab, Some(tab()));
    assert!(view.send.enabled);
    assert!(view.enqueue.enabled);
    assert!(state.consume_dirty());
}

#[test]
fn stored_url_is_used_for_every_request() {
    init_logging();
    let (state, _) = update_popup(
        PopupState::new(),
        PopupMsg::ServerUrlLoaded(Some("http://nas.local:9000/".to_string())),
    );
    let (_state, effects) = update_popup(state, PopupMsg::TabResolved(Some(tab())));
    assert_eq!(
        effects,
        vec![PopupEffect::CheckHealth {
            server_url: "http://nas.local:9000".to_string()
        }]
    );
}

#[test]
fn blank_stored_url_falls_back_to_default() {
    init_logging();
    let (state, _) = update_popup(
        PopupState::new(),
        PopupMsg::ServerUrlLoaded(Some("  ".to_string())),
    );
    assert_eq!(state.server_url(), DEFAULT_SERVER_URL);
}

#[test]
fn offline_server_disables_both_action_buttons() {
    init_logging();
    for reply in [
        Reply::Rejected("Server returned status 503".to_string()),
        Reply::Unreachable("connection refused".to_string()),
    ] {
        let (state, _) = update_popup(PopupState::new(), PopupMsg::TabResolved(Some(tab())));
        let (state, effects) = update_popup(state, PopupMsg::HealthChecked(reply));
        let view = state.view();
        assert_eq!(view.server, ServerStatus::Offline);
        assert!(!view.send.enabled);
        assert!(!view.enqueue.enabled);
        // Queue info is still requested after the probe.
        assert_eq!(effects.len(), 1);

        // Clicking a disabled button does nothing.
        let (_state, effects) = update_popup(state, PopupMsg::SendClicked);
        assert!(effects.is_empty());
    }
}

#[test]
fn online_server_without_tab_keeps_buttons_disabled() {
    init_logging();
    let (state, _) = update_popup(PopupState::new(), PopupMsg::TabResolved(None));
    let (state, _) = update_popup(
        state,
        PopupMsg::HealthChecked(Reply::Ok(())),
    );
    let view = state.view();
    assert!(!view.send.enabled);
    assert!(!view.enqueue.enabled);
}

#[test]
fn zero_queue_count_hides_badge() {
    init_logging();
    let (state, _) = update_popup(PopupState::new(), PopupMsg::QueueCounted(Reply::Ok(2)));
    assert_eq!(state.view().queue_badge, Some(2));

    let (state, _) = update_popup(state, PopupMsg::QueueCounted(Reply::Ok(0)));
    assert_eq!(state.view().queue_badge, None);
}

#[test]
fn failed_queue_count_keeps_last_badge_and_status() {
    init_logging();
    let (state, _) = update_popup(PopupState::new(), PopupMsg::QueueCounted(Reply::Ok(2)));
    let (state, effects) = update_popup(
        state,
        PopupMsg::QueueCounted(Reply::Unreachable("boom".to_string())),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().queue_badge, Some(2));
    assert_eq!(state.view().status, None);
}
