//! Core domain traits for hub routing.
//!
//! The heuristic and the validator only ever talk to the outside world
//! through these seams. Concrete apps plug in a routing API, a database,
//! or a test fake.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LookupError, OracleError};

/// A named point on the map: either a departer hub or a delivery stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lng,
        }
    }

    /// Location coordinates (lat, lng).
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// True when lat is within [-90, 90] and lng within [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Real-road distance and travel time between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
}

impl Leg {
    pub const ZERO: Leg = Leg {
        distance_meters: 0,
        duration_seconds: 0,
    };

    pub fn new(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }
}

/// Answers "how far, how long" for a pair of locations.
///
/// Implementations decide how: a routing API, a cached table, or a stub.
/// A non-fatal error excludes that candidate from the current round only.
pub trait DistanceOracle {
    fn leg(&self, from: &Location, to: &Location, vehicle: &str) -> Result<Leg, OracleError>;
}

/// Provider-side trip optimizer (closed loop from the origin).
pub trait TripOptimizer {
    fn optimize_trip(
        &self,
        origin: &Location,
        waypoints: &[Location],
        vehicle: &str,
    ) -> Result<TripPlan, OracleError>;
}

/// Visiting order computed by a [`TripOptimizer`].
///
/// `waypoint_order` indexes into the waypoints passed to the optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripPlan {
    pub waypoint_order: Vec<usize>,
    pub total_distance_meters: u64,
    pub total_duration_seconds: u64,
}

/// Existence checks against the two categories of named hubs.
///
/// Names match exactly and case-sensitively.
pub trait HubDirectory {
    fn is_destination(&self, name: &str) -> Result<bool, LookupError>;

    fn is_departer(&self, name: &str) -> Result<bool, LookupError>;

    /// Destination names are checked first, then departer names.
    ///
    /// A failed destination lookup still falls through to the departers;
    /// the error surfaces only when both lookups fail.
    fn hub_exists(&self, name: &str) -> Result<bool, LookupError> {
        let destination_err = match self.is_destination(name) {
            Ok(true) => return Ok(true),
            Ok(false) => None,
            Err(err) => {
                warn!(hub = name, error = %err, "destination lookup failed, trying departers");
                Some(err)
            }
        };
        match (self.is_departer(name), destination_err) {
            (Ok(found), _) => Ok(found),
            (Err(err), None) => Err(err),
            (Err(_), Some(err)) => Err(err),
        }
    }
}

/// A persisted schedule row that departs a hub at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDeparture {
    pub route_name: String,
    pub hub_departer: String,
    pub departure_time: String,
}

/// Lookup of already-persisted schedules.
pub trait ScheduleStore {
    /// Schedules of other routes leaving `hub_departer` at exactly `departure_time`.
    fn conflicting_schedules(
        &self,
        hub_departer: &str,
        departure_time: &str,
        excluding_route_name: &str,
    ) -> Result<Vec<ScheduledDeparture>, LookupError>;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    fn leg(&self, from: &Location, to: &Location, vehicle: &str) -> Result<Leg, OracleError> {
        (**self).leg(from, to, vehicle)
    }
}

impl<T: TripOptimizer + ?Sized> TripOptimizer for &T {
    fn optimize_trip(
        &self,
        origin: &Location,
        waypoints: &[Location],
        vehicle: &str,
    ) -> Result<TripPlan, OracleError> {
        (**self).optimize_trip(origin, waypoints, vehicle)
    }
}

impl<T: HubDirectory + ?Sized> HubDirectory for &T {
    fn is_destination(&self, name: &str) -> Result<bool, LookupError> {
        (**self).is_destination(name)
    }

    fn is_departer(&self, name: &str) -> Result<bool, LookupError> {
        (**self).is_departer(name)
    }

    fn hub_exists(&self, name: &str) -> Result<bool, LookupError> {
        (**self).hub_exists(name)
    }
}

impl<T: ScheduleStore + ?Sized> ScheduleStore for &T {
    fn conflicting_schedules(
        &self,
        hub_departer: &str,
        departure_time: &str,
        excluding_route_name: &str,
    ) -> Result<Vec<ScheduledDeparture>, LookupError> {
        (**self).conflicting_schedules(hub_departer, departure_time, excluding_route_name)
    }
}
