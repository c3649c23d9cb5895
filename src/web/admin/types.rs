use serde::Deserialize;

#[derive(Default, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Every dashboard form posts the key typed into the admin key field.
#[derive(Deserialize)]
pub struct AdminActionForm {
    #[serde(default)]
    pub admin_key: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl AdminActionForm {
    pub fn target_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Reviews,
    Contacts,
}

impl Tab {
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Reviews => "reviews",
            Tab::Contacts => "contacts",
        }
    }
}
