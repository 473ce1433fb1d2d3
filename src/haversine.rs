//! Haversine distance oracle (offline fallback when Goong is unavailable).
//!
//! Uses great-circle distance and an assumed speed to estimate travel time.
//! Less accurate than a road router but never fails.

use crate::error::OracleError;
use crate::traits::{DistanceOracle, Leg, Location};

/// Average truck speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineOracle {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineOracle {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineOracle {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two (lat, lng) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }

    fn km_to_seconds(&self, km: f64) -> u64 {
        (km / self.speed_kmh * 3600.0).round() as u64
    }
}

impl DistanceOracle for HaversineOracle {
    fn leg(&self, from: &Location, to: &Location, _vehicle: &str) -> Result<Leg, OracleError> {
        let km = Self::haversine_km(from.coords(), to.coords());
        Ok(Leg::new((km * 1000.0).round() as u64, self.km_to_seconds(km)))
    }
}
