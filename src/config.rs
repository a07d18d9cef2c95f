use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::sessions::{default_sessions, MarketSession};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Storage
    pub journal_dir: String,

    // Cloud sync
    pub cloud_backend_url: String,

    // Calculator defaults
    pub default_capital: f64,
    pub default_risk_pct: f64,
    pub default_instrument: String,

    // Sessions (UTC hours)
    pub sessions: Vec<MarketSession>,
    pub display_tz: String,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            journal_dir: env("JOURNAL_DIR", "data"),
            cloud_backend_url: env("CLOUD_BACKEND_URL", "http://localhost:3000"),
            default_capital: env("DEFAULT_CAPITAL", "1000").parse().unwrap_or(1000.0),
            default_risk_pct: env("DEFAULT_RISK_PCT", "1").parse().unwrap_or(1.0),
            default_instrument: env("DEFAULT_INSTRUMENT", "EURUSD"),
            sessions: default_sessions(),
            display_tz: env("DISPLAY_TZ", "UTC"),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    /// Parsed display zone; an unknown name falls back to UTC.
    pub fn display_tz(&self) -> Tz {
        match self.display_tz.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warn!("Unknown DISPLAY_TZ '{}', using UTC", self.display_tz);
                Tz::UTC
            }
        }
    }
}
