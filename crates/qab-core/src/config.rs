use std::{env, fmt, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// How updates reach the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Telegram pushes updates to `POST /webhook`.
    Webhook,
    /// The bot long-polls Telegram; the HTTP server only serves health checks.
    Polling,
}

/// Typed configuration, sourced from the environment.
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub admin_user_id: i64,
    pub mode: DeliveryMode,
    pub webhook_url: Option<String>,

    // Supabase
    pub supabase_url: String,
    pub supabase_key: String,
    pub supabase_timeout: Duration,

    // HTTP
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        let on_render = env_bool("RENDER").unwrap_or(false);
        if !on_render {
            load_dotenv_if_present(Path::new(".env"))?;
        }
        Self::from_lookup(on_render, |key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in `load`).
    pub fn from_lookup(
        on_render: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let bot_token = get("BOT_TOKEN").ok_or_else(|| required("BOT_TOKEN"))?;
        let supabase_url = get("SUPABASE_URL").ok_or_else(|| required("SUPABASE_URL"))?;
        let supabase_key = get("SUPABASE_KEY").ok_or_else(|| required("SUPABASE_KEY"))?;

        let admin_user_id = match get("ADMIN_USER_ID") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                Error::Config(format!("ADMIN_USER_ID must be an integer, got {raw:?}"))
            })?,
            None => 0,
        };

        let mode = match get("BOT_MODE").map(|s| s.trim().to_lowercase()) {
            Some(m) if m == "webhook" => DeliveryMode::Webhook,
            Some(m) if m == "polling" => DeliveryMode::Polling,
            Some(other) => {
                return Err(Error::Config(format!(
                    "BOT_MODE must be `webhook` or `polling`, got {other:?}"
                )))
            }
            None if on_render => DeliveryMode::Webhook,
            None => DeliveryMode::Polling,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => 5000,
        };

        let supabase_timeout = match get("SUPABASE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "SUPABASE_TIMEOUT_SECS must be a number of seconds, got {raw:?}"
                ))
            })?),
            None => Duration::from_secs(10),
        };

        Ok(Self {
            bot_token,
            admin_user_id,
            mode,
            webhook_url: get("WEBHOOK_URL"),
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_key,
            supabase_timeout,
            port,
        })
    }
}

// Secrets stay out of `{:?}` output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("admin_user_id", &self.admin_user_id)
            .field("mode", &self.mode)
            .field("webhook_url", &self.webhook_url)
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &"<redacted>")
            .field("supabase_timeout", &self.supabase_timeout)
            .field("port", &self.port)
            .finish()
    }
}

/// Load `path` into the environment without overriding existing values.
///
/// Only a missing file is tolerated; a malformed one is a config error.
fn load_dotenv_if_present(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!(
            "failed to load {}: {e}",
            path.display()
        ))),
    }
}

fn required(key: &str) -> Error {
    Error::Config(format!("{key} environment variable is required"))
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
