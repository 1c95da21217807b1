use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Outbound messaging port.
///
/// Replies and the activation notice go through this trait so the admin service
/// stays independent of the Telegram client.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_with_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    /// Replace the text (and keyboard, when given) of an existing message.
    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
