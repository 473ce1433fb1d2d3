//! Configuration from environment variables (and `.env`, if present).

use crate::error::ConfigError;
use crate::goong::{GoongClient, GoongConfig};
use crate::supabase::{SupabaseClient, SupabaseConfig};

const DEFAULT_VEHICLE: &str = "truck";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub goong_api_key: String,
    /// Overrides the public Goong endpoint (tests, proxies).
    pub goong_base_url: Option<String>,
    pub http_timeout_secs: u64,
    /// Vehicle profile passed to the distance oracle.
    pub default_vehicle: String,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            supabase_url: require("SUPABASE_URL")?,
            supabase_anon_key: require("SUPABASE_ANON_KEY")?,
            goong_api_key: require("GOONG_API_KEY")?,
            goong_base_url: get("GOONG_BASE_URL"),
            http_timeout_secs,
            default_vehicle: get("DEFAULT_VEHICLE").unwrap_or_else(|| DEFAULT_VEHICLE.to_string()),
        })
    }

    pub fn goong(&self) -> GoongConfig {
        let defaults = GoongConfig::default();
        GoongConfig {
            base_url: self.goong_base_url.clone().unwrap_or(defaults.base_url),
            api_key: self.goong_api_key.clone(),
            timeout_secs: self.http_timeout_secs,
            ..defaults
        }
    }

    pub fn supabase(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.supabase_url.clone(),
            anon_key: self.supabase_anon_key.clone(),
            timeout_secs: self.http_timeout_secs,
        }
    }

    /// Routing client and hub store, ready to inject.
    pub fn clients(&self) -> Result<(GoongClient, SupabaseClient), ConfigError> {
        Ok((GoongClient::new(self.goong())?, SupabaseClient::new(self.supabase())?))
    }
}
