//! Supabase adapter (`ActivationStore` over the PostgREST API).
//!
//! Tables are addressed as `{SUPABASE_URL}/rest/v1/{table}`; filters use the
//! PostgREST `column=eq.value` syntax.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize,
};

use qab_core::{
    domain::{ActivationChange, ActivationRecord, RowId, UserRecord, UserSummary},
    errors::Error,
    store::ActivationStore,
    Result,
};

const USERS: &str = "users";
const ACTIVATIONS: &str = "user_activations";
const USER_COLUMNS: &str = "id,telegram_id,username,created_at";

#[derive(Clone)]
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Store(format!("supabase client build error: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>> {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Store(format!("supabase request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "supabase request failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Store(format!("supabase read error: {e}")))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut query: Vec<(&str, String)> = vec![("select", columns.to_string())];
        query.extend(filters.iter().cloned());
        self.fetch(self.request(Method::GET, table).query(&query))
            .await
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

/// JSON body of the `PATCH` for an activation change.
fn activation_patch(change: &ActivationChange) -> serde_json::Value {
    match change {
        ActivationChange::Activate { by, at } => serde_json::json!({
            "is_active": true,
            "activated_by": by.0.to_string(),
            "activated_at": at.to_rfc3339(),
        }),
        ActivationChange::Deactivate => serde_json::json!({
            "is_active": false,
            "activated_by": null,
            "activated_at": null,
        }),
    }
}

#[derive(Deserialize)]
struct ActivationFlag {
    #[serde(default)]
    is_active: Option<bool>,
}

/// Embedded `user_activations(...)`: an array for one-to-many relationships,
/// a single object (or null) when PostgREST detects one-to-one.
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddedActivation {
    Many(Vec<ActivationFlag>),
    One(ActivationFlag),
}

impl EmbeddedActivation {
    fn is_active(&self) -> bool {
        match self {
            Self::Many(rows) => rows
                .first()
                .and_then(|r| r.is_active)
                .unwrap_or(false),
            Self::One(row) => row.is_active.unwrap_or(false),
        }
    }
}

#[derive(Deserialize)]
struct UserWithActivation {
    #[serde(flatten)]
    user: UserRecord,
    #[serde(default)]
    user_activations: Option<EmbeddedActivation>,
}

impl From<UserWithActivation> for UserSummary {
    fn from(row: UserWithActivation) -> Self {
        let is_active = row
            .user_activations
            .as_ref()
            .map(EmbeddedActivation::is_active)
            .unwrap_or(false);
        UserSummary {
            user: row.user,
            is_active,
        }
    }
}

#[async_trait]
impl ActivationStore for SupabaseStore {
    async fn find_user_by_telegram_id(&self, telegram_id: i64) -> Result<Option<UserRecord>> {
        let rows: Vec<UserRecord> = self
            .select(USERS, "*", &[("telegram_id", eq(telegram_id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_user(&self, id: &RowId) -> Result<Option<UserRecord>> {
        let rows: Vec<UserRecord> = self.select(USERS, USER_COLUMNS, &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_activation(&self, user_id: &RowId) -> Result<Option<ActivationRecord>> {
        let rows: Vec<ActivationRecord> = self
            .select(ACTIVATIONS, "*", &[("user_id", eq(user_id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let columns = format!("{USER_COLUMNS},user_activations(is_active)");
        let rows: Vec<UserWithActivation> = self.select(USERS, &columns, &[]).await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn count_users(&self) -> Result<usize> {
        let rows: Vec<IgnoredAny> = self.select(USERS, "id", &[]).await?;
        Ok(rows.len())
    }

    async fn count_active(&self) -> Result<usize> {
        let rows: Vec<IgnoredAny> = self
            .select(ACTIVATIONS, "user_id", &[("is_active", eq(true))])
            .await?;
        Ok(rows.len())
    }

    async fn apply_activation(
        &self,
        user_id: &RowId,
        change: ActivationChange,
    ) -> Result<Vec<ActivationRecord>> {
        let req = self
            .request(Method::PATCH, ACTIVATIONS)
            .query(&[("user_id", eq(user_id))])
            .header("Prefer", "return=representation")
            .json(&activation_patch(&change));
        let rows: Vec<ActivationRecord> = self.fetch(req).await?;
        tracing::debug!(user = %user_id, updated = rows.len(), "activation patched");
        Ok(rows)
    }
}
