use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::cloud::CloudTransport;
use crate::config::Config;
use crate::error::{JournalError, JournalResult};
use crate::trading::trade_record::TradeRecord;

const SAVE_PATH: &str = "/api/save-journal";
const LOAD_PATH: &str = "/api/load-journal";
const PROFILE_PATH: &str = "/api/user-profile";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    #[serde(rename = "journalData")]
    journal_data: &'a [TradeRecord],
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    given_name: Option<String>,
    name: Option<String>,
}

pub struct HttpCloudClient {
    client: Client,
    base_url: String,
}

impl HttpCloudClient {
    pub fn new(cfg: &Config) -> JournalResult<Self> {
        Self::with_base_url(&cfg.cloud_backend_url)
    }

    pub fn with_base_url(base_url: &str) -> JournalResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> JournalResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JournalError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn failure(resp: Response, action: &str) -> JournalError {
    let status = resp.status();
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    JournalError::Transport(format!("failed to {}: {}", action, message))
}

#[async_trait]
impl CloudTransport for HttpCloudClient {
    async fn save(&self, trades: &[TradeRecord]) -> JournalResult<()> {
        let resp = self
            .client
            .post(self.url(SAVE_PATH))
            .json(&SaveRequest {
                journal_data: trades,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(failure(resp, "save").await);
        }
        debug!("Saved {} entries", trades.len());
        Ok(())
    }

    async fn load(&self) -> JournalResult<Vec<TradeRecord>> {
        let resp = self.client.get(self.url(LOAD_PATH)).send().await?;

        if !resp.status().is_success() {
            return Err(failure(resp, "load").await);
        }
        let trades: Vec<TradeRecord> = resp
            .json()
            .await
            .map_err(|e| JournalError::Transport(format!("invalid journal payload: {}", e)))?;
        debug!("Loaded {} entries", trades.len());
        Ok(trades)
    }

    async fn user_profile(&self) -> JournalResult<Option<String>> {
        let resp = self.client.get(self.url(PROFILE_PATH)).send().await?;

        if !resp.status().is_success() {
            return Err(failure(resp, "fetch user profile").await);
        }
        let profile: ProfileResponse = resp.json().await?;
        Ok(profile.given_name.or(profile.name))
    }
}
