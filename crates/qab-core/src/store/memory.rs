use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::{ActivationChange, ActivationRecord, RowId, UserRecord, UserSummary},
    errors::Error,
    store::ActivationStore,
    Result,
};

/// In-memory stand-in for the remote tables.
#[derive(Default)]
pub(crate) struct MemoryStore {
    pub users: Mutex<Vec<UserRecord>>,
    pub activations: Mutex<Vec<ActivationRecord>>,
    pub mutations: Mutex<usize>,
    pub fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn add_user(&self, id: &str, telegram_id: i64, username: Option<&str>) {
        self.users.lock().unwrap().push(UserRecord {
            id: RowId(id.to_string()),
            telegram_id,
            username: username.map(str::to_string),
            created_at: Some("2025-01-02T03:04:05+00:00".to_string()),
        });
    }

    pub fn add_activation(&self, user_id: &str, active: bool) {
        self.activations.lock().unwrap().push(ActivationRecord {
            user_id: RowId(user_id.to_string()),
            is_active: Some(active),
            activated_by: None,
            activated_at: None,
        });
    }

    pub fn activation(&self, user_id: &str) -> Option<ActivationRecord> {
        self.activations
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id.as_str() == user_id)
            .cloned()
    }

    pub fn mutation_count(&self) -> usize {
        *self.mutations.lock().unwrap()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Store("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ActivationStore for MemoryStore {
    async fn find_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<UserRecord>> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.telegram_id == telegram_id).cloned())
    }

    async fn find_user(&self, id: &RowId) -> Result<Option<UserRecord>> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_activation(&self, user_id: &RowId) -> Result<Option<ActivationRecord>> {
        self.check()?;
        Ok(self.activation(user_id.as_str()))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.check()?;
        let users = self.users.lock().unwrap().clone();
        Ok(users
            .into_iter()
            .map(|user| {
                let is_active = self
                    .activation(user.id.as_str())
                    .map(|a| a.is_active())
                    .unwrap_or(false);
                UserSummary { user, is_active }
            })
            .collect())
    }

    async fn count_users(&self) -> Result<usize> {
        self.check()?;
        Ok(self.users.lock().unwrap().len())
    }

    async fn count_active(&self) -> Result<usize> {
        self.check()?;
        Ok(self
            .activations
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.is_active())
            .count())
    }

    async fn apply_activation(
        &self,
        user_id: &RowId,
        change: ActivationChange,
    ) -> Result<Vec<ActivationRecord>> {
        self.check()?;
        *self.mutations.lock().unwrap() += 1;

        let mut rows = self.activations.lock().unwrap();
        let mut changed = Vec::new();
        for row in rows.iter_mut().filter(|a| &a.user_id == user_id) {
            match &change {
                ActivationChange::Activate { by, at } => {
                    row.is_active = Some(true);
                    row.activated_by = Some(by.0.to_string());
                    row.activated_at = Some(at.to_rfc3339());
                }
                ActivationChange::Deactivate => {
                    row.is_active = Some(false);
                    row.activated_by = None;
                    row.activated_at = None;
                }
            }
            changed.push(row.clone());
        }
        Ok(changed)
    }
}
