use kindle_core::{
    update_popup, ActionState, BatchItem, PopupEffect, PopupMsg, PopupState,
    PreviewSummary, Reply, StatusLine, StatusTone, TabSnapshot,
};
use pretty_assertions::assert_eq;

const SERVER: &str = "http://localhost:5123";
const PAGE: &str = "https://example.com/post";

fn ready_popup() -> PopupState {
    kindle_logging::initialize_for_tests();
    let (state, _) = update_popup(PopupState::new(), PopupMsg::ServerUrlLoaded(None));
    let (state, _) = update_popup(
        state,
        PopupMsg::TabResolved(Some(TabSnapshot {
            title: "Post".to_string(),
            url: PAGE.to_string(),
        })),
    );
    let (state, _) = update_popup(
        state,
        PopupMsg::HealthChecked(Reply::Ok(())),
    );
    state
}

fn batch(flags: &[bool]) -> Vec<BatchItem> {
    flags
        .iter()
        .map(|&success| BatchItem {
            success,
            title: None,
        })
        .collect()
}

#[test]
fn send_disables_button_while_pending() {
    let (state, effects) = update_popup(ready_popup(), PopupMsg::SendClicked);

    assert_eq!(
        effects,
        vec![PopupEffect::SendArticle {
            server_url: SERVER.to_string(),
            url: PAGE.to_string(),
        }]
    );
    let view = state.view();
    assert!(!view.send.enabled);
    assert_eq!(view.send.state, ActionState::Pending);
    assert_eq!(
        view.status,
        Some(StatusLine::new(StatusTone::Loading, "Sending to Kindle..."))
    );

    // A second click while pending is ignored.
    let (_state, effects) = update_popup(state, PopupMsg::SendClicked);
    assert!(effects.is_empty());
}

#[test]
fn send_success_shows_title() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendClicked);
    let (state, effects) = update_popup(
        state,
        PopupMsg::ArticleSent(Reply::Ok("Great read".to_string())),
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.send.enabled);
    assert_eq!(view.send.state, ActionState::Succeeded);
    assert_eq!(
        view.status,
        Some(StatusLine::new(StatusTone::Success, "Sent: Great read"))
    );
}

#[test]
fn send_rejection_reenables_button_and_shows_error() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendClicked);
    let (state, _) = update_popup(state, PopupMsg::ArticleSent(Reply::Rejected("x".to_string())));

    let view = state.view();
    assert!(view.send.enabled);
    assert_eq!(view.send.state, ActionState::Failed);
    assert_eq!(view.status, Some(StatusLine::new(StatusTone::Error, "x")));
}

#[test]
fn send_transport_failure_shows_generic_message() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendClicked);
    let (state, _) = update_popup(
        state,
        PopupMsg::ArticleSent(Reply::Unreachable("tcp connect error".to_string())),
    );

    let view = state.view();
    assert!(view.send.enabled);
    assert_eq!(
        view.status,
        Some(StatusLine::new(
            StatusTone::Error,
            "Failed to connect to server"
        ))
    );
}

#[test]
fn stray_reply_without_pending_action_is_ignored() {
    let state = ready_popup();
    let before = state.view();
    let (state, effects) = update_popup(state, PopupMsg::ArticleSent(Reply::Ok("t".to_string())));
    assert!(effects.is_empty());
    assert_eq!(state.view(), before);
}

#[test]
fn enqueue_success_reports_length_and_refreshes_badge() {
    let (state, effects) = update_popup(ready_popup(), PopupMsg::EnqueueClicked);
    assert_eq!(
        effects,
        vec![PopupEffect::EnqueueArticle {
            server_url: SERVER.to_string(),
            url: PAGE.to_string(),
        }]
    );

    let (state, effects) = update_popup(state, PopupMsg::ArticleQueued(Reply::Ok(Some(3))));
    assert_eq!(
        effects,
        vec![PopupEffect::FetchQueueCount {
            server_url: SERVER.to_string()
        }]
    );
    let view = state.view();
    assert!(view.enqueue.enabled);
    assert_eq!(view.queue_badge, Some(3));
    assert_eq!(
        view.status,
        Some(StatusLine::new(
            StatusTone::Success,
            "Added to queue (3 in queue)"
        ))
    );
}

#[test]
fn enqueue_without_reported_length_still_refreshes_badge() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::QueueCounted(Reply::Ok(1)));
    let (state, _) = update_popup(state, PopupMsg::EnqueueClicked);
    let (state, effects) = update_popup(state, PopupMsg::ArticleQueued(Reply::Ok(None)));

    assert_eq!(
        effects,
        vec![PopupEffect::FetchQueueCount {
            server_url: SERVER.to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.enqueue.state, ActionState::Succeeded);
    assert_eq!(view.queue_badge, Some(1));
    assert_eq!(
        view.status,
        Some(StatusLine::new(StatusTone::Success, "Added to queue"))
    );
}

#[test]
fn enqueue_rejection_does_not_refresh_badge() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::EnqueueClicked);
    let (state, effects) = update_popup(
        state,
        PopupMsg::ArticleQueued(Reply::Rejected("URL is required".to_string())),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().enqueue.state, ActionState::Failed);
}

#[test]
fn send_queue_counts_successful_results() {
    let (state, effects) = update_popup(ready_popup(), PopupMsg::SendQueueClicked);
    assert_eq!(
        effects,
        vec![PopupEffect::SendQueue {
            server_url: SERVER.to_string()
        }]
    );

    let (state, effects) = update_popup(
        state,
        PopupMsg::QueueSent(Reply::Ok(batch(&[true, false, true]))),
    );
    assert_eq!(
        effects,
        vec![PopupEffect::FetchQueueCount {
            server_url: SERVER.to_string()
        }]
    );
    let status = state.view().status.unwrap();
    assert_eq!(status.tone, StatusTone::Success);
    assert_eq!(status.text, "Sent 2 of 3 articles");
}

#[test]
fn send_queue_rejection_still_refreshes_badge() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendQueueClicked);
    let (state, effects) = update_popup(
        state,
        PopupMsg::QueueSent(Reply::Rejected("Queue is empty".to_string())),
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(
        state.view().status,
        Some(StatusLine::new(StatusTone::Error, "Queue is empty"))
    );
}

#[test]
fn send_queue_transport_failure_skips_refresh() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendQueueClicked);
    let (state, effects) = update_popup(
        state,
        PopupMsg::QueueSent(Reply::Unreachable("timed out".to_string())),
    );
    assert!(effects.is_empty());
    assert!(state.view().send_queue.enabled);
}

#[test]
fn clear_queue_resets_badge() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::QueueCounted(Reply::Ok(4)));
    let (state, effects) = update_popup(state, PopupMsg::ClearQueueClicked);
    assert_eq!(
        effects,
        vec![PopupEffect::ClearQueue {
            server_url: SERVER.to_string()
        }]
    );
    let (state, effects) = update_popup(state, PopupMsg::QueueCleared(Reply::Ok(())));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().queue_badge, None);
}

#[test]
fn preview_reports_word_count() {
    let (state, effects) = update_popup(ready_popup(), PopupMsg::PreviewClicked);
    assert_eq!(
        effects,
        vec![PopupEffect::PreviewArticle {
            server_url: SERVER.to_string(),
            url: PAGE.to_string(),
        }]
    );
    let (state, _) = update_popup(
        state,
        PopupMsg::ArticlePreviewed(Reply::Ok(PreviewSummary {
            title: "Post".to_string(),
            word_count: 812,
        })),
    );
    assert_eq!(
        state.view().status.unwrap().text,
        "Preview: Post (812 words)"
    );
}

#[test]
fn actions_are_independent() {
    let (state, _) = update_popup(ready_popup(), PopupMsg::SendClicked);
    let (state, effects) = update_popup(state, PopupMsg::EnqueueClicked);
    assert_eq!(effects.len(), 1);
    let view = state.view();
    assert_eq!(view.send.state, ActionState::Pending);
    assert_eq!(view.enqueue.state, ActionState::Pending);
    assert!(view.send_queue.enabled);
}
