//! In-memory collaborators for driving the heuristic and validator.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use hub_routing::error::{LookupError, OracleError};
use hub_routing::traits::{
    DistanceOracle, HubDirectory, Leg, Location, ScheduleStore, ScheduledDeparture, TripOptimizer,
    TripPlan,
};

/// Oracle backed by an explicit table keyed on location ids.
///
/// Pairs missing from the table answer `NoRoute`.
#[derive(Default)]
pub struct TableOracle {
    legs: HashMap<(String, String), Leg>,
    fatal: HashSet<(String, String)>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leg(mut self, from: &str, to: &str, distance_meters: u64, duration_seconds: u64) -> Self {
        self.legs.insert(
            (from.to_string(), to.to_string()),
            Leg::new(distance_meters, duration_seconds),
        );
        self
    }

    pub fn with_fatal(mut self, from: &str, to: &str) -> Self {
        self.fatal.insert((from.to_string(), to.to_string()));
        self
    }

    /// (from id, to id, vehicle) for every call, in order.
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl DistanceOracle for TableOracle {
    fn leg(&self, from: &Location, to: &Location, vehicle: &str) -> Result<Leg, OracleError> {
        self.calls
            .lock()
            .unwrap()
            .push((from.id.clone(), to.id.clone(), vehicle.to_string()));

        let key = (from.id.clone(), to.id.clone());
        if self.fatal.contains(&key) {
            return Err(OracleError::Fatal(format!("{} -> {}", key.0, key.1)));
        }
        self.legs
            .get(&key)
            .copied()
            .ok_or_else(|| OracleError::NoRoute(format!("{} -> {}", key.0, key.1)))
    }
}

/// Oracle that never answers.
pub struct DownOracle;

impl DistanceOracle for DownOracle {
    fn leg(&self, _from: &Location, _to: &Location, _vehicle: &str) -> Result<Leg, OracleError> {
        Err(OracleError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Trip optimizer returning a canned answer.
pub struct CannedTrip(Result<TripPlan, fn() -> OracleError>);

impl CannedTrip {
    pub fn answering(plan: TripPlan) -> Self {
        Self(Ok(plan))
    }

    pub fn failing(make_error: fn() -> OracleError) -> Self {
        Self(Err(make_error))
    }
}

impl TripOptimizer for CannedTrip {
    fn optimize_trip(
        &self,
        _origin: &Location,
        _waypoints: &[Location],
        _vehicle: &str,
    ) -> Result<TripPlan, OracleError> {
        match &self.0 {
            Ok(plan) => Ok(plan.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// Hub directory over two name sets. Records every lookup.
#[derive(Default)]
pub struct HubSet {
    destinations: HashSet<String>,
    departers: HashSet<String>,
    lookups: Mutex<Vec<String>>,
}

impl HubSet {
    pub fn new(departers: &[&str], destinations: &[&str]) -> Self {
        Self {
            departers: departers.iter().map(|name| name.to_string()).collect(),
            destinations: destinations.iter().map(|name| name.to_string()).collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl HubDirectory for HubSet {
    fn is_destination(&self, name: &str) -> Result<bool, LookupError> {
        self.lookups.lock().unwrap().push(name.to_string());
        Ok(self.destinations.contains(name))
    }

    fn is_departer(&self, name: &str) -> Result<bool, LookupError> {
        Ok(self.departers.contains(name))
    }
}

/// Hub directory whose backend is down.
pub struct BrokenHubs;

impl HubDirectory for BrokenHubs {
    fn is_destination(&self, _name: &str) -> Result<bool, LookupError> {
        Err(LookupError::Decode("connection reset".to_string()))
    }

    fn is_departer(&self, _name: &str) -> Result<bool, LookupError> {
        Err(LookupError::Decode("connection reset".to_string()))
    }
}

/// Hub directory whose destinations table is down; departers still answer.
pub struct DestinationsDown(pub HubSet);

impl HubDirectory for DestinationsDown {
    fn is_destination(&self, _name: &str) -> Result<bool, LookupError> {
        Err(LookupError::Decode("destinations table down".to_string()))
    }

    fn is_departer(&self, name: &str) -> Result<bool, LookupError> {
        self.0.is_departer(name)
    }
}

/// Schedule store over a fixed list of persisted departures.
#[derive(Default)]
pub struct Schedules(pub Vec<ScheduledDeparture>);

impl Schedules {
    pub fn with(entries: &[(&str, &str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(route_name, hub, time)| ScheduledDeparture {
                    route_name: route_name.to_string(),
                    hub_departer: hub.to_string(),
                    departure_time: time.to_string(),
                })
                .collect(),
        )
    }
}

impl ScheduleStore for Schedules {
    fn conflicting_schedules(
        &self,
        hub_departer: &str,
        departure_time: &str,
        excluding_route_name: &str,
    ) -> Result<Vec<ScheduledDeparture>, LookupError> {
        Ok(self
            .0
            .iter()
            .filter(|entry| {
                entry.hub_departer == hub_departer
                    && entry.departure_time == departure_time
                    && entry.route_name != excluding_route_name
            })
            .cloned()
            .collect())
    }
}

/// Schedule store whose backend is down.
pub struct BrokenSchedules;

impl ScheduleStore for BrokenSchedules {
    fn conflicting_schedules(
        &self,
        _hub_departer: &str,
        _departure_time: &str,
        _excluding_route_name: &str,
    ) -> Result<Vec<ScheduledDeparture>, LookupError> {
        Err(LookupError::Status {
            status: 500,
            body: "boom".to_string(),
        })
    }
}
