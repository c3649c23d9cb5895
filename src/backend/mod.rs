use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

mod models;

pub use models::{
    AdminAction, AdminKey, ContactSubmission, NewContact, PendingReview, display_date,
    display_datetime,
};
use models::{ContactList, PendingList};

use crate::config::BackendSettings;

const CONTACT_TABLE: &str = "contact_submissions";
const ADMIN_FUNCTION: &str = "reviews-admin";
const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Client for the hosted backend: the data API for public inserts and the
/// admin function for moderation.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    config: BackendConfig,
}

#[derive(Clone)]
struct BackendConfig {
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    pub fn new(http: Client, settings: &BackendSettings) -> Self {
        Self {
            http,
            config: BackendConfig {
                base_url: settings.base_url.clone(),
                anon_key: settings.anon_key.clone(),
            },
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    fn function_url(&self, function: &str) -> String {
        format!("{}/functions/v1/{function}", self.config.base_url)
    }

    /// Insert a validated contact submission using the public key.
    pub async fn insert_contact(&self, contact: &NewContact) -> Result<()> {
        let response = self
            .http
            .post(self.table_url(CONTACT_TABLE))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .header("Prefer", "return=minimal")
            .json(contact)
            .send()
            .await
            .context("failed to reach backend data API")?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "contact submission stored");
            return Ok(());
        }

        let body = read_json_or_empty(response).await;
        let message = error_field(&body, "message").unwrap_or_else(|| request_failed(status));
        warn!(%status, %message, "backend rejected contact submission");
        bail!(message)
    }

    /// Call the admin function with `action` and decode its JSON reply.
    pub async fn post_admin<T: DeserializeOwned>(
        &self,
        key: &AdminKey,
        action: &AdminAction,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.function_url(ADMIN_FUNCTION))
            .header(header::CONTENT_TYPE, "application/json")
            .header(ADMIN_KEY_HEADER, key.as_str())
            .json(action)
            .send()
            .await
            .context("failed to reach admin function")?;

        let status = response.status();
        let body = read_json_or_empty(response).await;
        if !status.is_success() {
            let message = error_field(&body, "error").unwrap_or_else(|| request_failed(status));
            warn!(%status, action = action.name(), "admin function call failed");
            bail!(message);
        }

        serde_json::from_value(body)
            .map_err(|err| anyhow!("unexpected {} response payload: {err}", action.name()))
    }

    pub async fn list_pending(&self, key: &AdminKey) -> Result<Vec<PendingReview>> {
        let list: PendingList = self.post_admin(key, &AdminAction::ListPending).await?;
        Ok(list.pending.unwrap_or_default())
    }

    pub async fn list_contacts(&self, key: &AdminKey) -> Result<Vec<ContactSubmission>> {
        let list: ContactList = self.post_admin(key, &AdminAction::ListContacts).await?;
        Ok(list.contacts.unwrap_or_default())
    }

    pub async fn approve(&self, key: &AdminKey, id: &str) -> Result<()> {
        self.post_admin::<Value>(key, &AdminAction::Approve { id: id.to_string() })
            .await
            .map(|_| ())
    }

    pub async fn reject(&self, key: &AdminKey, id: &str) -> Result<()> {
        self.post_admin::<Value>(key, &AdminAction::Reject { id: id.to_string() })
            .await
            .map(|_| ())
    }

    pub async fn mark_read(&self, key: &AdminKey, id: &str) -> Result<()> {
        self.post_admin::<Value>(key, &AdminAction::MarkRead { id: id.to_string() })
            .await
            .map(|_| ())
    }
}

/// Bodies that are empty or not JSON are treated as `{}`.
async fn read_json_or_empty(response: reqwest::Response) -> Value {
    let text = match response.text().await {
        Ok(text) => text,
        Err(err) => {
            debug!(?err, "failed to read backend response body");
            return Value::Object(Default::default());
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn error_field(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|message| !message.trim().is_empty())
}

fn request_failed(status: StatusCode) -> String {
    format!("Request failed ({})", status.as_u16())
}
