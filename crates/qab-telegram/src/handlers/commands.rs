use qab_core::{
    domain::{ChatId, Sender},
    messaging::types::Reply,
};

use crate::router::AppState;

pub(crate) fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub(crate) async fn handle_command(state: &AppState, chat_id: ChatId, sender: &Sender, text: &str) {
    let (cmd, _args) = parse_command(text);

    let reply = match cmd.as_str() {
        "start" => Reply::text(state.service.start(sender).await),
        "admin" => state.service.admin_panel(sender),
        _ => return,
    };

    tracing::debug!(user_id = sender.user_id.0, command = %cmd, "command handled");
    send_reply(state, chat_id, reply).await;
}

async fn send_reply(state: &AppState, chat_id: ChatId, reply: Reply) {
    let res = match reply.keyboard {
        Some(kb) => {
            state
                .messenger
                .send_with_keyboard(chat_id, &reply.text, kb)
                .await
        }
        None => state.messenger.send_text(chat_id, &reply.text).await,
    };
    if let Err(e) = res {
        tracing::error!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }
}
