//! Test doubles for exercising the handlers without Telegram or Supabase.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use teloxide::Bot;

use qab_core::{
    admin::AdminService,
    config::Config,
    domain::{
        ActivationChange, ActivationRecord, ChatId, MessageId, MessageRef, RowId, UserRecord,
        UserSummary,
    },
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    store::ActivationStore,
    Result,
};

use crate::router::AppState;

pub(crate) const ADMIN: i64 = 42;
pub(crate) const CHAT: i64 = 900;
pub(crate) const MESSAGE: i32 = 17;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    Answer(String),
    Send {
        chat_id: i64,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Edit {
        chat_id: i64,
        message_id: i32,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
}

#[derive(Default)]
pub(crate) struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
}

impl RecordingMessenger {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        self.record(Call::Send {
            chat_id: chat_id.0,
            text: text.to_string(),
            keyboard: None,
        });
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(1),
        })
    }

    async fn send_with_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        self.record(Call::Send {
            chat_id: chat_id.0,
            text: text.to_string(),
            keyboard: Some(keyboard),
        });
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(1),
        })
    }

    async fn edit_text(
        &self,
        msg: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<()> {
        self.record(Call::Edit {
            chat_id: msg.chat_id.0,
            message_id: msg.message_id.0,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, _text: Option<&str>) -> Result<()> {
        self.record(Call::Answer(callback_id.to_string()));
        Ok(())
    }
}

/// Four users, one active. Every other query fails, and every call is counted.
#[derive(Default)]
pub(crate) struct CountingStore {
    calls: AtomicUsize,
}

impl CountingStore {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn unsupported<T>() -> Result<T> {
    Err(Error::Store("not seeded".to_string()))
}

#[async_trait]
impl ActivationStore for CountingStore {
    async fn find_user_by_telegram_id(&self, _: i64) -> Result<Option<UserRecord>> {
        self.hit();
        unsupported()
    }
    async fn find_user(&self, _: &RowId) -> Result<Option<UserRecord>> {
        self.hit();
        unsupported()
    }
    async fn find_activation(&self, _: &RowId) -> Result<Option<ActivationRecord>> {
        self.hit();
        unsupported()
    }
    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.hit();
        unsupported()
    }
    async fn count_users(&self) -> Result<usize> {
        self.hit();
        Ok(4)
    }
    async fn count_active(&self) -> Result<usize> {
        self.hit();
        Ok(1)
    }
    async fn apply_activation(
        &self,
        _: &RowId,
        _: ActivationChange,
    ) -> Result<Vec<ActivationRecord>> {
        self.hit();
        unsupported()
    }
}

/// App state whose messenger and store are the recording doubles.
pub(crate) fn state() -> (Arc<AppState>, Arc<RecordingMessenger>, Arc<CountingStore>) {
    let cfg = Config::from_lookup(false, |k| match k {
        "BOT_TOKEN" => Some("123456:TEST".to_string()),
        "SUPABASE_URL" => Some("http://127.0.0.1:9".to_string()),
        "SUPABASE_KEY" => Some("key".to_string()),
        "ADMIN_USER_ID" => Some(ADMIN.to_string()),
        _ => None,
    })
    .unwrap();

    let messenger = Arc::new(RecordingMessenger::default());
    let store = Arc::new(CountingStore::default());
    let service = Arc::new(AdminService::new(
        store.clone(),
        messenger.clone(),
        cfg.admin_user_id,
    ));

    let state = AppState {
        bot: Bot::new(cfg.bot_token.clone()),
        cfg: Arc::new(cfg),
        service,
        messenger: messenger.clone(),
    };
    (Arc::new(state), messenger, store)
}

fn user(id: i64) -> Value {
    json!({"id": id, "is_bot": false, "first_name": "Sara"})
}

pub(crate) fn message_json(from: i64, text: &str) -> Value {
    json!({
        "message_id": MESSAGE,
        "date": 1_700_000_000,
        "chat": {"id": CHAT, "type": "private", "first_name": "Sara"},
        "from": user(from),
        "text": text
    })
}

/// Callback query JSON as Telegram sends it; `with_message: false` mimics
/// a button on an inline message, which carries no chat message.
pub(crate) fn callback_json(from: i64, data: &str, with_message: bool) -> Value {
    let mut q = json!({
        "id": "cbq-1",
        "from": user(from),
        "chat_instance": "-100",
        "data": data
    });
    if with_message {
        q["message"] = message_json(ADMIN, "panel");
    } else {
        q["inline_message_id"] = json!("inline-1");
    }
    q
}
