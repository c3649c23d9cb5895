use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Validated contact form payload, shaped like a `contact_submissions` row insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContact {
    pub name: String,
    pub contact: String,
    pub details: String,
}

/// A visitor review waiting for moderation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingReview {
    pub id: String,
    pub name: String,
    pub rating: i32,
    #[serde(default)]
    pub design: Option<String>,
    pub body: String,
    pub created_at: String,
}

/// A message left through the contact form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub details: String,
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub read: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload accepted by the admin function. The backend dispatches on `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    ListPending,
    ListContacts,
    Approve { id: String },
    Reject { id: String },
    MarkRead { id: String },
}

impl AdminAction {
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::ListPending => "list_pending",
            AdminAction::ListContacts => "list_contacts",
            AdminAction::Approve { .. } => "approve",
            AdminAction::Reject { .. } => "reject",
            AdminAction::MarkRead { .. } => "mark_read",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PendingList {
    #[serde(default)]
    pub pending: Option<Vec<PendingReview>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContactList {
    #[serde(default)]
    pub contacts: Option<Vec<ContactSubmission>>,
}

/// Operator-supplied credential for the admin function.
///
/// Only ever built from request input and dropped with the request; it is not
/// stored in sessions, cookies or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminKey(String);

impl AdminKey {
    /// Trims the raw input. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminKey(<redacted>)")
    }
}

/// Formats a backend timestamp as a calendar date, falling back to the raw value.
pub fn display_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Formats a backend timestamp with minutes, falling back to the raw value.
pub fn display_datetime(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M (UTC%:z)").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}
