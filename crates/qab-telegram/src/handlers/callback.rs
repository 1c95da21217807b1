use teloxide::types::CallbackQuery;

use qab_core::domain::{ChatId, MessageId, MessageRef};

use crate::router::AppState;

use super::sender_of;

pub(crate) async fn handle_callback(q: CallbackQuery, state: &AppState) {
    // Always answer first so the button spinner stops, whatever happens next.
    if let Err(e) = state.messenger.answer_callback_query(&q.id, None).await {
        tracing::warn!(error = %e, "failed to answer callback query");
    }

    let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) else {
        return;
    };
    let target = MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    };

    let sender = sender_of(&q.from);
    let Some(reply) = state.service.handle_callback(&sender, data).await else {
        tracing::debug!(data, "ignoring unknown callback payload");
        return;
    };

    if let Err(e) = state
        .messenger
        .edit_text(target, &reply.text, reply.keyboard)
        .await
    {
        tracing::error!(chat_id = target.chat_id.0, error = %e, "failed to edit admin message");
    }
}
