/// Core error type for the activation bot.
///
/// Adapter crates (Supabase, Telegram) map their transport errors into this type
/// so handlers can log them uniformly before replying with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
