//! Supabase (PostgREST) adapter for hub and schedule lookups.

use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;

use crate::error::LookupError;
use crate::traits::{HubDirectory, ScheduleStore, ScheduledDeparture};

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    config: SupabaseConfig,
    client: reqwest::blocking::Client,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// `GET /rest/v1/{table}` with PostgREST filter params.
    fn select<T: DeserializeOwned>(&self, table: &str, params: &[(&str, String)]) -> Result<Vec<T>, LookupError> {
        let url = format!("{}/rest/v1/{}", self.config.url.trim_end_matches('/'), table);
        debug!(%url, "supabase select");

        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
            .query(params)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<T>>()
            .map_err(|err| LookupError::Decode(err.to_string()))
    }

    fn any_row(&self, table: &str, column: &str, value: &str) -> Result<bool, LookupError> {
        let rows: Vec<IgnoredAny> = self.select(
            table,
            &[
                ("select", "id".to_string()),
                (column, format!("eq.{value}")),
                ("limit", "1".to_string()),
            ],
        )?;
        Ok(!rows.is_empty())
    }
}

impl HubDirectory for SupabaseClient {
    fn is_destination(&self, name: &str) -> Result<bool, LookupError> {
        self.any_row("destinations", "carrier_name", name)
    }

    fn is_departer(&self, name: &str) -> Result<bool, LookupError> {
        self.any_row("departers", "name", name)
    }
}

impl ScheduleStore for SupabaseClient {
    fn conflicting_schedules(
        &self,
        hub_departer: &str,
        departure_time: &str,
        excluding_route_name: &str,
    ) -> Result<Vec<ScheduledDeparture>, LookupError> {
        self.select(
            "route_schedules",
            &[
                ("select", "route_name,hub_departer,departure_time".to_string()),
                ("hub_departer", format!("eq.{hub_departer}")),
                ("departure_time", format!("eq.{departure_time}")),
                ("route_name", format!("neq.{excluding_route_name}")),
            ],
        )
    }
}
