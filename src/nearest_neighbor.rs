//! Greedy nearest-neighbor routing (fallback when no trip optimizer answers).
//!
//! Each round asks the oracle for the distance from the current stop to every
//! unvisited destination and moves to the closest one. That is O(n²) oracle
//! calls, issued one at a time, so this is meant for small destination sets.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OptimizeError;
use crate::traits::{DistanceOracle, Leg, Location};

/// Destination count above which the heuristic gets expensive in oracle calls.
pub const RECOMMENDED_MAX_DESTINATIONS: usize = 20;

/// What to do when no unvisited destination answers in a round after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StarvationPolicy {
    /// Drop the first unvisited destination and keep going.
    #[default]
    DropFirst,
    /// Abort the whole optimization.
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct NearestNeighborOptions {
    pub on_starved: StarvationPolicy,
    /// Hard cap on the number of destinations. `None` only logs past
    /// [`RECOMMENDED_MAX_DESTINATIONS`].
    pub max_destinations: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_number: usize,
    pub location: Location,
    pub distance_from_previous: u64,
    pub duration_from_previous: u64,
    pub cumulative_distance: u64,
    pub cumulative_duration: u64,
}

impl RouteStop {
    /// Stop 0: the origin, with zero distance and duration.
    pub fn origin(location: &Location) -> Self {
        Self {
            stop_number: 0,
            location: location.clone(),
            distance_from_previous: 0,
            duration_from_previous: 0,
            cumulative_distance: 0,
            cumulative_duration: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Number of stops including the origin.
    pub total_stops: usize,
    pub total_distance_meters: u64,
    /// Kilometers rounded to two decimals.
    pub total_distance_km: f64,
    pub total_duration_seconds: u64,
    pub total_duration_minutes: u64,
    /// `HH:MM`, see [`format_duration_hhmm`].
    pub total_duration_formatted: String,
    pub vehicle_type: String,
}

impl RouteSummary {
    pub fn from_totals(
        total_stops: usize,
        total_distance_meters: u64,
        total_duration_seconds: u64,
        vehicle: &str,
    ) -> Self {
        Self {
            total_stops,
            total_distance_meters,
            total_distance_km: (total_distance_meters as f64 / 10.0).round() / 100.0,
            total_duration_seconds,
            total_duration_minutes: (total_duration_seconds + 30) / 60,
            total_duration_formatted: format_duration_hhmm(total_duration_seconds),
            vehicle_type: vehicle.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub route: Vec<RouteStop>,
    pub summary: RouteSummary,
    /// Destinations dropped because the oracle never answered for them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreachable: Vec<Location>,
}

/// Build a visiting order by always stepping to the closest unvisited destination.
///
/// Ties go to the destination that appears first in `destinations`.
/// Non-fatal oracle errors exclude a candidate for the current round only;
/// a fatal one aborts with [`OptimizeError::Oracle`].
pub fn optimize_nearest_neighbor<O>(
    origin: &Location,
    destinations: &[Location],
    oracle: &O,
    vehicle: &str,
    options: &NearestNeighborOptions,
) -> Result<OptimizedRoute, OptimizeError>
where
    O: DistanceOracle + ?Sized,
{
    check_locations(origin, destinations)?;

    if let Some(limit) = options.max_destinations {
        if destinations.len() > limit {
            return Err(OptimizeError::TooManyDestinations {
                count: destinations.len(),
                limit,
            });
        }
    } else if destinations.len() > RECOMMENDED_MAX_DESTINATIONS {
        warn!(
            count = destinations.len(),
            "nearest-neighbor over many destinations issues O(n^2) oracle calls"
        );
    }

    let mut unvisited: Vec<&Location> = destinations.iter().collect();
    let mut route = Vec::with_capacity(destinations.len() + 1);
    route.push(RouteStop::origin(origin));

    let mut unreachable = Vec::new();
    let mut current = origin;
    let mut total_distance = 0;
    let mut total_duration = 0;
    let mut round = 0;

    while !unvisited.is_empty() {
        round += 1;

        match nearest_candidate(current, &unvisited, oracle, vehicle)? {
            Some((index, leg)) => {
                let next = unvisited.remove(index);
                total_distance += leg.distance_meters;
                total_duration += leg.duration_seconds;

                debug!(
                    round,
                    stop = %next.name,
                    distance = leg.distance_meters,
                    "visiting nearest destination"
                );

                route.push(RouteStop {
                    stop_number: route.len(),
                    location: next.clone(),
                    distance_from_previous: leg.distance_meters,
                    duration_from_previous: leg.duration_seconds,
                    cumulative_distance: total_distance,
                    cumulative_duration: total_duration,
                });
                current = next;
            }
            None if round == 1 => return Err(OptimizeError::Unreachable),
            None => match options.on_starved {
                StarvationPolicy::Fail => {
                    return Err(OptimizeError::Starved {
                        remaining: unvisited.len(),
                    });
                }
                StarvationPolicy::DropFirst => {
                    let dropped = unvisited.remove(0);
                    warn!(round, stop = %dropped.name, "no distance data for any candidate, dropping");
                    unreachable.push(dropped.clone());
                }
            },
        }
    }

    let summary = RouteSummary::from_totals(route.len(), total_distance, total_duration, vehicle);

    Ok(OptimizedRoute {
        route,
        summary,
        unreachable,
    })
}

/// Index and leg of the closest candidate, or `None` if none answered.
fn nearest_candidate<O>(
    current: &Location,
    candidates: &[&Location],
    oracle: &O,
    vehicle: &str,
) -> Result<Option<(usize, Leg)>, OptimizeError>
where
    O: DistanceOracle + ?Sized,
{
    let mut best: Option<(usize, Leg)> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let leg = match oracle.leg(current, candidate, vehicle) {
            Ok(leg) => leg,
            Err(err) if err.is_fatal() => return Err(OptimizeError::Oracle(err)),
            Err(err) => {
                warn!(from = %current.name, to = %candidate.name, error = %err, "distance lookup failed");
                continue;
            }
        };

        // Strictly smaller: the first of equal candidates wins.
        let closer = best.is_none_or(|(_, best_leg)| leg.distance_meters < best_leg.distance_meters);
        if closer {
            best = Some((index, leg));
        }
    }

    Ok(best)
}

fn check_locations(origin: &Location, destinations: &[Location]) -> Result<(), OptimizeError> {
    for location in std::iter::once(origin).chain(destinations) {
        if !location.is_valid() {
            return Err(OptimizeError::InvalidLocation(format!(
                "{} ({}, {})",
                location.id, location.lat, location.lng
            )));
        }
    }
    Ok(())
}

/// Render seconds as zero-padded `HH:MM`. Hours do not roll over into days.
pub fn format_duration_hhmm(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{:02}:{:02}", hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_pads() {
        assert_eq!(format_duration_hhmm(0), "00:00");
        assert_eq!(format_duration_hhmm(59), "00:00");
        assert_eq!(format_duration_hhmm(3_660), "01:01");
    }

    #[test]
    fn test_format_duration_no_day_rollover() {
        assert_eq!(format_duration_hhmm(27 * 3600 + 5 * 60), "27:05");
    }

    #[test]
    fn test_summary_rounding() {
        let summary = RouteSummary::from_totals(3, 35_004, 90, "truck");
        assert_eq!(summary.total_distance_km, 35.0);
        assert_eq!(summary.total_duration_minutes, 2);
        assert_eq!(summary.total_duration_formatted, "00:01");
        assert_eq!(summary.vehicle_type, "truck");

        let summary = RouteSummary::from_totals(2, 12_345, 89, "car");
        assert_eq!(summary.total_distance_km, 12.35);
        assert_eq!(summary.total_duration_minutes, 1);
    }
}
