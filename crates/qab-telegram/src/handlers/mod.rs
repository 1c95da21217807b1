//! Telegram update handlers.
//!
//! Each handler is a small adapter that extracts the sender and payload from
//! the teloxide types, calls into the `qab-core` admin service, and sends the
//! resulting reply through the messaging port. Failures are logged; the chat
//! only ever sees the reply templates.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message, User},
};

use qab_core::domain::{ChatId, Sender, UserId};

use crate::router::AppState;
mod callback;
mod commands;

pub(crate) fn sender_of(user: &User) -> Sender {
    Sender {
        user_id: UserId(user.id.0 as i64),
        first_name: user.first_name.clone(),
    }
}

pub async fn handle_callback(
    _bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(q, &state).await;
    Ok(())
}

pub async fn handle_message(_bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    // Only `/start` and `/admin` are handled; everything else is ignored.
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            let sender = sender_of(user);
            commands::handle_command(&state, ChatId(msg.chat.id.0), &sender, text).await;
        }
    }

    Ok(())
}
