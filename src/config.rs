use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};
use tracing::info;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api";
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DISCORD_TIMEOUT_MS: u64 = 1500;
const DEFAULT_SITE_OWNER: &str = "Luzi";

/// Runtime configuration assembled from the process environment.
#[derive(Clone)]
pub struct SiteConfig {
    pub port: u16,
    pub site_owner: String,
    pub backend: BackendSettings,
    pub discord: Option<DiscordSettings>,
    pub admin_password: String,
    pub session_ttl_hours: i64,
}

#[derive(Clone, Debug)]
pub struct BackendSettings {
    pub base_url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct DiscordSettings {
    pub guild_id: String,
    pub api_base: String,
    /// Per-request bound; the landing page waits on this call.
    pub timeout: Duration,
}

impl SiteConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = required("BACKEND_URL")?;
        let anon_key = required("BACKEND_ANON_KEY")?;
        let admin_password = required("ADMIN_PASSWORD")?;

        let timeout_secs: u64 = optional_parsed("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let session_ttl_hours: i64 =
            optional_parsed("ADMIN_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?;
        if session_ttl_hours <= 0 {
            return Err(anyhow!("ADMIN_SESSION_TTL_HOURS must be positive"));
        }

        let discord = match env::var("DISCORD_GUILD_ID") {
            Ok(guild_id) if !guild_id.trim().is_empty() => Some(DiscordSettings {
                guild_id: guild_id.trim().to_string(),
                api_base: env::var("DISCORD_API_BASE")
                    .map(|base| trim_base(&base))
                    .unwrap_or_else(|_| DEFAULT_DISCORD_API_BASE.to_string()),
                timeout: Duration::from_millis(optional_parsed(
                    "DISCORD_TIMEOUT_MS",
                    DEFAULT_DISCORD_TIMEOUT_MS,
                )?),
            }),
            _ => {
                info!("DISCORD_GUILD_ID not set, community badge disabled");
                None
            }
        };

        Ok(Self {
            port: optional_parsed("PORT", DEFAULT_PORT)?,
            site_owner: env::var("SITE_OWNER").unwrap_or_else(|_| DEFAULT_SITE_OWNER.to_string()),
            backend: BackendSettings {
                base_url: trim_base(&base_url),
                anon_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            discord,
            admin_password,
            session_ttl_hours,
        })
    }
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("port", &self.port)
            .field("site_owner", &self.site_owner)
            .field("backend_url", &self.backend.base_url)
            .field("discord", &self.discord)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish_non_exhaustive()
    }
}

fn required(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{key} env var is missing"))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{key} env var is empty"));
    }
    Ok(value)
}

fn optional_parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow!("invalid {key} value {raw:?}: {err}")),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
