//! Port over the two remote relations (`users`, `user_activations`).
//!
//! The bot never owns these tables: it reads them and performs single-row
//! updates of the activation flag. The Supabase adapter lives in `qab-supabase`.

use async_trait::async_trait;

use crate::{
    domain::{ActivationChange, ActivationRecord, RowId, UserRecord, UserSummary},
    Result,
};

#[cfg(test)]
pub(crate) mod memory;

#[async_trait]
pub trait ActivationStore: Send + Sync {
    async fn find_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<UserRecord>>;

    async fn find_user(&self, id: &RowId) -> Result<Option<UserRecord>>;

    async fn find_activation(&self, user_id: &RowId) -> Result<Option<ActivationRecord>>;

    /// All users with their activation state.
    async fn list_users(&self) -> Result<Vec<UserSummary>>;

    async fn count_users(&self) -> Result<usize>;

    async fn count_active(&self) -> Result<usize>;

    /// Update the activation row of `user_id`; returns the rows that changed
    /// (empty when the user has no activation row).
    async fn apply_activation(
        &self,
        user_id: &RowId,
        change: ActivationChange,
    ) -> Result<Vec<ActivationRecord>>;
}
