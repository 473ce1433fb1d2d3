//! Goong Maps HTTP adapter for distances and trip optimization.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::OracleError;
use crate::traits::{DistanceOracle, Leg, Location, TripOptimizer, TripPlan};

#[derive(Debug, Clone)]
pub struct GoongConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Minimum spacing between two requests, to stay under the provider's rate limit.
    pub min_request_interval_ms: u64,
}

impl Default for GoongConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rsapi.goong.io".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
            min_request_interval_ms: 300,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoongClient {
    config: GoongConfig,
    client: reqwest::blocking::Client,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl GoongClient {
    pub fn new(config: GoongConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Sleep until `min_request_interval_ms` has passed since the previous request.
    fn throttle(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        if interval.is_zero() {
            return;
        }

        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, OracleError> {
        self.throttle();

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        debug!(%url, "goong request");

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .map_err(|err| OracleError::Decode(err.to_string()))
    }
}

impl DistanceOracle for GoongClient {
    fn leg(&self, from: &Location, to: &Location, vehicle: &str) -> Result<Leg, OracleError> {
        let params = [
            ("origins", format!("{},{}", from.lat, from.lng)),
            ("destinations", format!("{},{}", to.lat, to.lng)),
            ("vehicle", vehicle.to_string()),
        ];
        let body: DistanceMatrixResponse = self.get("DistanceMatrix", &params)?;

        let element = body
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| OracleError::NoRoute("no distance data returned".to_string()))?;

        if element.status != "OK" {
            return Err(OracleError::NoRoute(format!(
                "distance calculation failed: {}",
                element.status
            )));
        }

        match (element.distance, element.duration) {
            (Some(distance), Some(duration)) => Ok(Leg::new(
                distance.value.round() as u64,
                duration.value.round() as u64,
            )),
            _ => Err(OracleError::Decode("element without distance or duration".to_string())),
        }
    }
}

impl TripOptimizer for GoongClient {
    /// Closed trip: starts and ends at `origin`.
    fn optimize_trip(
        &self,
        origin: &Location,
        waypoints: &[Location],
        vehicle: &str,
    ) -> Result<TripPlan, OracleError> {
        let origin_coords = format!("{},{}", origin.lng, origin.lat);
        let waypoint_coords = waypoints
            .iter()
            .map(|waypoint| format!("{},{}", waypoint.lng, waypoint.lat))
            .collect::<Vec<_>>()
            .join(";");

        let params = [
            ("origin", origin_coords.clone()),
            ("destination", origin_coords),
            ("waypoints", waypoint_coords),
            ("vehicle", vehicle.to_string()),
        ];
        let body: TripResponse = self.get("Trip", &params)?;

        let trip = body
            .trips
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::NoRoute("no trip found".to_string()))?;

        if let Some(&bad) = trip.waypoint_order.iter().find(|&&index| index >= waypoints.len()) {
            return Err(OracleError::Decode(format!(
                "waypoint index {bad} out of range for {} waypoint(s)",
                waypoints.len()
            )));
        }

        Ok(TripPlan {
            waypoint_order: trip.waypoint_order,
            total_distance_meters: trip.distance.round() as u64,
            total_duration_seconds: trip.duration.round() as u64,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<ValueText>,
    duration: Option<ValueText>,
}

#[derive(Debug, Deserialize)]
struct ValueText {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct TripResponse {
    #[serde(default)]
    trips: Vec<Trip>,
}

#[derive(Debug, Deserialize)]
struct Trip {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    waypoint_order: Vec<usize>,
}
