//! Command / callback handling: map each input onto one canned store
//! operation and one reply template.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{ActivationChange, ChatId, RowId, Sender, Stats},
    messaging::{port::MessagingPort, types::Reply},
    replies,
    security::is_admin,
    store::ActivationStore,
    Result,
};

/// Parsed callback-button payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminAction {
    ShowInactive,
    ShowAll,
    Stats,
    Activate(RowId),
    Deactivate(RowId),
    BackToAdmin,
}

impl AdminAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "show_inactive" => return Some(Self::ShowInactive),
            "show_all" => return Some(Self::ShowAll),
            "stats" => return Some(Self::Stats),
            "back_to_admin" => return Some(Self::BackToAdmin),
            _ => {}
        }

        if let Some(id) = data.strip_prefix("deactivate_") {
            return row_id(id).map(Self::Deactivate);
        }
        if let Some(id) = data.strip_prefix("activate_") {
            return row_id(id).map(Self::Activate);
        }
        None
    }
}

fn row_id(raw: &str) -> Option<RowId> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(RowId(raw.to_string()))
    }
}

pub struct AdminService {
    store: Arc<dyn ActivationStore>,
    messenger: Arc<dyn MessagingPort>,
    admin_user_id: i64,
}

impl AdminService {
    pub fn new(
        store: Arc<dyn ActivationStore>,
        messenger: Arc<dyn MessagingPort>,
        admin_user_id: i64,
    ) -> Self {
        Self {
            store,
            messenger,
            admin_user_id,
        }
    }

    pub fn is_admin(&self, sender: &Sender) -> bool {
        is_admin(Some(sender.user_id), self.admin_user_id)
    }

    /// `/start`: report the sender's registration / activation state.
    pub async fn start(&self, sender: &Sender) -> String {
        match self.lookup_start(sender).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(user_id = sender.user_id.0, error = %e, "start lookup failed");
                replies::START_FAILED.to_string()
            }
        }
    }

    async fn lookup_start(&self, sender: &Sender) -> Result<String> {
        let Some(user) = self.store.find_user_by_telegram_id(sender.user_id.0).await? else {
            return Ok(replies::start_unknown(&sender.first_name));
        };

        let active = self
            .store
            .find_activation(&user.id)
            .await?
            .map(|a| a.is_active())
            .unwrap_or(false);

        Ok(if active {
            replies::start_active(&sender.first_name)
        } else {
            replies::start_pending(&sender.first_name)
        })
    }

    /// `/admin`: the panel keyboard, or a refusal for anyone but the admin.
    pub fn admin_panel(&self, sender: &Sender) -> Reply {
        if !self.is_admin(sender) {
            return Reply::text(replies::PANEL_UNAUTHORIZED);
        }
        replies::admin_panel()
    }

    /// Callback buttons. `None` means the payload is not ours and no edit is due.
    pub async fn handle_callback(&self, sender: &Sender, data: &str) -> Option<Reply> {
        if !self.is_admin(sender) {
            tracing::warn!(user_id = sender.user_id.0, data, "unauthorized admin callback");
            return Some(Reply::text(replies::ACTION_UNAUTHORIZED));
        }

        let action = AdminAction::parse(data)?;
        tracing::info!(admin = sender.user_id.0, ?action, "admin action");

        let reply = match action {
            AdminAction::ShowInactive => self.show_inactive().await,
            AdminAction::ShowAll => self.show_all().await,
            AdminAction::Stats => self.show_stats().await,
            AdminAction::Activate(id) => self.activate(sender, &id).await,
            AdminAction::Deactivate(id) => self.deactivate(&id).await,
            AdminAction::BackToAdmin => replies::admin_panel(),
        };
        Some(reply)
    }

    async fn show_inactive(&self) -> Reply {
        match self.store.list_users().await {
            Ok(users) => {
                let inactive: Vec<_> = users.into_iter().filter(|u| !u.is_active).collect();
                replies::inactive_users(&inactive)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to list inactive users");
                Reply::text(replies::FETCH_FAILED)
            }
        }
    }

    async fn show_all(&self) -> Reply {
        match self.store.list_users().await {
            Ok(users) => replies::all_users(&users),
            Err(e) => {
                tracing::error!(error = %e, "failed to list users");
                Reply::text(replies::FETCH_FAILED)
            }
        }
    }

    async fn show_stats(&self) -> Reply {
        let counts = async {
            let total = self.store.count_users().await?;
            let active = self.store.count_active().await?;
            Ok::<_, crate::Error>(Stats { total, active })
        };
        match counts.await {
            Ok(stats) => replies::stats(stats),
            Err(e) => {
                tracing::error!(error = %e, "failed to load stats");
                Reply::text(replies::STATS_FAILED)
            }
        }
    }

    async fn activate(&self, admin: &Sender, id: &RowId) -> Reply {
        match self.try_activate(admin, id).await {
            Ok(text) => Reply::text(text),
            Err(e) => {
                tracing::error!(user = %id, error = %e, "failed to activate user");
                Reply::text(replies::ACTIVATE_ERROR)
            }
        }
    }

    async fn try_activate(&self, admin: &Sender, id: &RowId) -> Result<String> {
        let change = ActivationChange::Activate {
            by: admin.user_id,
            at: Utc::now(),
        };
        let updated = self.store.apply_activation(id, change).await?;
        if updated.is_empty() {
            return Ok(replies::ACTIVATE_FAILED.to_string());
        }

        let Some(user) = self.store.find_user(id).await? else {
            return Ok(replies::ACTIVATED_WITHOUT_USER.to_string());
        };

        // The notice is best-effort: a user who never opened the bot cannot be messaged.
        if let Err(e) = self
            .messenger
            .send_text(ChatId(user.telegram_id), replies::ACTIVATION_NOTICE)
            .await
        {
            tracing::warn!(
                telegram_id = user.telegram_id,
                error = %e,
                "could not notify activated user"
            );
        }

        tracing::info!(user = %id, admin = admin.user_id.0, "user activated");
        Ok(replies::activated(&user.display_name()))
    }

    async fn deactivate(&self, id: &RowId) -> Reply {
        match self
            .store
            .apply_activation(id, ActivationChange::Deactivate)
            .await
        {
            Ok(updated) if updated.is_empty() => Reply::text(replies::DEACTIVATE_FAILED),
            Ok(_) => {
                tracing::info!(user = %id, "user deactivated");
                Reply::text(replies::DEACTIVATED)
            }
            Err(e) => {
                tracing::error!(user = %id, error = %e, "failed to deactivate user");
                Reply::text(replies::DEACTIVATE_ERROR)
            }
        }
    }
}
