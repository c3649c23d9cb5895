use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DiscordSettings;

const ONLINE_STEP: u64 = 10;

/// Rounded presence figures shown on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscordCounts {
    pub online: String,
}

#[derive(Debug, Deserialize)]
struct WidgetPayload {
    #[serde(default)]
    presence_count: Option<u64>,
}

/// Reads the public guild widget. Every failure collapses to `None`.
#[derive(Clone)]
pub struct DiscordWidget {
    http: Client,
    settings: DiscordSettings,
}

impl DiscordWidget {
    pub fn new(http: Client, settings: DiscordSettings) -> Self {
        Self { http, settings }
    }

    pub async fn online_count(&self) -> Option<DiscordCounts> {
        let url = format!(
            "{}/guilds/{}/widget.json",
            self.settings.api_base, self.settings.guild_id
        );

        let request = self.http.get(&url).timeout(self.settings.timeout);
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(?err, "discord widget request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "discord widget disabled");
            return None;
        }

        match response.json::<WidgetPayload>().await {
            Ok(payload) => Some(DiscordCounts {
                online: payload
                    .presence_count
                    .map(|count| round_down(count, ONLINE_STEP))
                    .unwrap_or_else(|| "0+".to_string()),
            }),
            Err(err) => {
                debug!(?err, "discord widget returned an unreadable payload");
                None
            }
        }
    }
}

/// Floors `n` to a multiple of `step` and appends `+`.
pub fn round_down(n: u64, step: u64) -> String {
    let step = step.max(1);
    format!("{}+", (n / step) * step)
}
