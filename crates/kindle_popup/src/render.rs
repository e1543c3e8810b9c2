//! Text rendering of the controller view models.

use kindle_core::{
    ActionState, ButtonView, PopupViewModel, ServerStatus, SettingsViewModel, StatusLine,
    StatusTone,
};

pub fn render_popup(view: &PopupViewModel) -> Vec<String> {
    let server_label = match view.server {
        ServerStatus::Checking => "checking",
        ServerStatus::Online => "online",
        ServerStatus::Offline => "offline",
    };

    let mut lines = vec![format!("Server: {} ({})", view.server_url, server_label)];
    match &view.tab {
        Some(tab) if tab.title != tab.url => lines.push(format!("Page: {} <{}>", tab.title, tab.url)),
        Some(tab) => lines.push(format!("Page: {}", tab.url)),
        None => lines.push("Page: none".to_string()),
    }
    if let Some(count) = view.queue_badge {
        lines.push(format!(
            "Queue: {count} article{}",
            if count == 1 { "" } else { "s" }
        ));
    }
    lines.push(format!(
        "Actions: send {} | queue {} | send queue {} | clear {} | preview {}",
        button_label(view.send),
        button_label(view.enqueue),
        button_label(view.send_queue),
        button_label(view.clear_queue),
        button_label(view.preview),
    ));
    if let Some(status) = &view.status {
        lines.push(status_line(status));
    }
    lines
}

pub fn render_settings(view: &SettingsViewModel) -> Vec<String> {
    let mut lines = vec![format!("Server URL: {}", view.input)];
    if view.saved_indicator {
        lines.push(status_line(&StatusLine::new(
            StatusTone::Success,
            "Settings saved",
        )));
    }
    if let Some(error) = &view.store_error {
        lines.push(status_line(&StatusLine::new(StatusTone::Error, error.clone())));
    }
    lines.extend(view.connection_lines.iter().map(status_line));
    lines
}

fn status_line(line: &StatusLine) -> String {
    let marker = match line.tone {
        StatusTone::Loading => "[..]",
        StatusTone::Success => "[ok]",
        StatusTone::Error => "[error]",
    };
    format!("{marker} {}", line.text)
}

fn button_label(button: ButtonView) -> &'static str {
    match (button.enabled, button.state) {
        (_, ActionState::Pending) => "busy",
        (false, _) => "off",
        (true, _) => "on",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindle_core::{update_popup, PopupMsg, PopupState, Reply, TabSnapshot};

    fn online_popup() -> PopupState {
        let msgs = [
            PopupMsg::ServerUrlLoaded(None),
            PopupMsg::TabResolved(Some(TabSnapshot {
                title: "Post".to_string(),
                url: "https://example.com/post".to_string(),
            })),
            PopupMsg::HealthChecked(Reply::Ok(())),
            PopupMsg::QueueCounted(Reply::Ok(2)),
        ];
        msgs.into_iter()
            .fold(PopupState::new(), |state, msg| update_popup(state, msg).0)
    }

    #[test]
    fn popup_lists_server_page_queue_and_buttons() {
        let lines = render_popup(&online_popup().view());
        assert_eq!(
            lines,
            vec![
                "Server: http://localhost:5123 (online)".to_string(),
                "Page: Post <https://example.com/post>".to_string(),
                "Queue: 2 articles".to_string(),
                "Actions: send on | queue on | send queue on | clear on | preview on".to_string(),
            ]
        );
    }

    #[test]
    fn status_line_is_marked_by_tone() {
        let (state, _) = update_popup(online_popup(), PopupMsg::SendClicked);
        let lines = render_popup(&state.view());
        assert_eq!(lines.last().map(String::as_str), Some("[..] Sending to Kindle..."));
        assert!(lines.iter().any(|line| line.contains("send busy")));
    }
}
