use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;

use crate::{
    backend::BackendClient,
    config::SiteConfig,
    discord::DiscordWidget,
    web::auth::{SessionStore, hash_password},
};

#[derive(Clone)]
pub struct AppState {
    backend: BackendClient,
    discord: Option<DiscordWidget>,
    sessions: SessionStore,
    admin_password_hash: Arc<str>,
    session_ttl_hours: i64,
    site_owner: Arc<str>,
}

impl AppState {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.backend.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .context("failed to build HTTP client")?;

        let admin_password_hash = hash_password(&config.admin_password)
            .map_err(|err| anyhow!("failed to hash admin password: {err}"))?;

        Ok(Self {
            backend: BackendClient::new(http.clone(), &config.backend),
            discord: config
                .discord
                .clone()
                .map(|settings| DiscordWidget::new(http, settings)),
            sessions: SessionStore::default(),
            admin_password_hash: Arc::from(admin_password_hash),
            session_ttl_hours: config.session_ttl_hours,
            site_owner: Arc::from(config.site_owner.as_str()),
        })
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn discord(&self) -> Option<&DiscordWidget> {
        self.discord.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn admin_password_hash(&self) -> &str {
        &self.admin_password_hash
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours
    }

    pub fn site_owner(&self) -> &str {
        &self.site_owner
    }
}
