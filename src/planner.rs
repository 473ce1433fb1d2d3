//! Optimization fallback chain: trip optimizer, then nearest-neighbor, then input order.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::OptimizeError;
use crate::nearest_neighbor::{
    NearestNeighborOptions, OptimizedRoute, RouteStop, RouteSummary, optimize_nearest_neighbor,
};
use crate::traits::{DistanceOracle, Location, TripOptimizer, TripPlan};

/// Which strategy produced a [`PlannedRoute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMethod {
    #[serde(rename = "goong_trip_api")]
    TripApi,
    NearestNeighbor,
    InputOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    pub method: PlanMethod,
    #[serde(flatten)]
    pub plan: OptimizedRoute,
}

pub struct RoutePlanner<T, O> {
    optimizer: Option<T>,
    oracle: O,
    options: NearestNeighborOptions,
}

impl<T, O> RoutePlanner<T, O>
where
    T: TripOptimizer,
    O: DistanceOracle,
{
    pub fn new(optimizer: Option<T>, oracle: O) -> Self {
        Self {
            optimizer,
            oracle,
            options: NearestNeighborOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NearestNeighborOptions) -> Self {
        self.options = options;
        self
    }

    /// Plan a visiting order, degrading through the strategies until one works.
    ///
    /// Only a fatal oracle error or a bad request escapes; starvation of the
    /// heuristic falls through to input order.
    pub fn plan(
        &self,
        origin: &Location,
        destinations: &[Location],
        vehicle: &str,
    ) -> Result<PlannedRoute, OptimizeError> {
        if let Some(optimizer) = &self.optimizer {
            match optimizer.optimize_trip(origin, destinations, vehicle) {
                Ok(trip) if covers_all(&trip, destinations.len()) => {
                    info!(stops = destinations.len(), "planned with trip optimizer");
                    return Ok(PlannedRoute {
                        method: PlanMethod::TripApi,
                        plan: from_trip(origin, destinations, &trip, vehicle),
                    });
                }
                Ok(trip) => warn!(
                    order = ?trip.waypoint_order,
                    "trip optimizer returned an incomplete order, using nearest neighbor"
                ),
                Err(err) if err.is_fatal() => return Err(OptimizeError::Oracle(err)),
                Err(err) => warn!(error = %err, "trip optimizer failed, using nearest neighbor"),
            }
        }

        match optimize_nearest_neighbor(origin, destinations, &self.oracle, vehicle, &self.options) {
            Ok(plan) => {
                info!(stops = plan.route.len(), "planned with nearest neighbor");
                Ok(PlannedRoute {
                    method: PlanMethod::NearestNeighbor,
                    plan,
                })
            }
            Err(err @ (OptimizeError::Unreachable | OptimizeError::Starved { .. })) => {
                warn!(error = %err, "nearest neighbor failed, keeping input order");
                Ok(PlannedRoute {
                    method: PlanMethod::InputOrder,
                    plan: in_input_order(origin, destinations, vehicle),
                })
            }
            Err(err) => Err(err),
        }
    }
}

/// Every waypoint exactly once.
fn covers_all(trip: &TripPlan, waypoint_count: usize) -> bool {
    let mut seen = vec![false; waypoint_count];
    trip.waypoint_order.len() == waypoint_count
        && trip
            .waypoint_order
            .iter()
            .all(|&index| index < waypoint_count && !std::mem::replace(&mut seen[index], true))
}

/// Trip responses only carry totals, so per-leg metrics stay zero.
fn from_trip(origin: &Location, waypoints: &[Location], trip: &TripPlan, vehicle: &str) -> OptimizedRoute {
    let mut route = vec![RouteStop::origin(origin)];
    route.extend(trip.waypoint_order.iter().enumerate().map(|(i, &index)| RouteStop {
        stop_number: i + 1,
        ..RouteStop::origin(&waypoints[index])
    }));

    let summary = RouteSummary::from_totals(
        route.len(),
        trip.total_distance_meters,
        trip.total_duration_seconds,
        vehicle,
    );

    OptimizedRoute {
        route,
        summary,
        unreachable: Vec::new(),
    }
}

/// Last resort: no distance data at all.
fn in_input_order(origin: &Location, destinations: &[Location], vehicle: &str) -> OptimizedRoute {
    let mut route = vec![RouteStop::origin(origin)];
    route.extend(destinations.iter().enumerate().map(|(i, location)| RouteStop {
        stop_number: i + 1,
        ..RouteStop::origin(location)
    }));

    let summary = RouteSummary::from_totals(route.len(), 0, 0, vehicle);

    OptimizedRoute {
        route,
        summary,
        unreachable: Vec::new(),
    }
}
