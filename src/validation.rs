//! Route schedule validation.
//!
//! Structural problems (missing fields, bad times, unknown hubs) are errors
//! and block persistence. Scheduling oddities are warnings and never do.
//! All time comparisons are minute-of-day only; there is no calendar date.

use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::traits::{HubDirectory, ScheduleStore};

static TIME_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$").expect("time pattern compiles")
});

const VALID_DAY_OFFSETS: [i32; 3] = [0, 1, 2];
const VALID_NOTES: [&str; 5] = ["D", "D+1", "D+2", "Ngày D+1", "Ngày D+2"];

/// One leg of a multi-leg schedule.
///
/// Absent and empty string fields are both treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(default)]
    pub hub_departer: Option<String>,
    #[serde(default)]
    pub hub_destination: Option<String>,
    /// `HH:MM:SS`
    #[serde(default)]
    pub departure_time: Option<String>,
    /// `HH:MM:SS`
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub day_offset: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
}

impl RouteSegment {
    pub fn new(
        hub_departer: &str,
        hub_destination: &str,
        departure_time: &str,
        arrival_time: &str,
    ) -> Self {
        Self {
            hub_departer: Some(hub_departer.to_string()),
            hub_destination: Some(hub_destination.to_string()),
            departure_time: Some(departure_time.to_string()),
            arrival_time: Some(arrival_time.to_string()),
            ..Default::default()
        }
    }

    pub fn day_offset(mut self, day_offset: i32) -> Self {
        self.day_offset = Some(day_offset);
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Validates routes against a hub directory and the existing schedules.
#[derive(Debug, Clone)]
pub struct RouteValidator<H, S> {
    hubs: H,
    schedules: S,
}

impl<H, S> RouteValidator<H, S>
where
    H: HubDirectory,
    S: ScheduleStore,
{
    pub fn new(hubs: H, schedules: S) -> Self {
        Self { hubs, schedules }
    }

    pub fn validate_route(&self, route_name: &str, segments: &[RouteSegment]) -> ValidationResult {
        if segments.is_empty() {
            return ValidationResult::from_parts(
                vec!["At least one segment is required".to_string()],
                Vec::new(),
            );
        }

        let mut errors = Vec::new();
        if route_name.trim().is_empty() {
            errors.push("Route name is required".to_string());
        }

        for (index, segment) in segments.iter().enumerate() {
            errors.extend(self.validate_segment(segment, index));
        }

        let mut warnings = self.check_timing_conflicts(route_name, segments);
        warnings.extend(check_logical_sequence(segments));
        warnings.extend(check_day_offset_consistency(segments));

        ValidationResult::from_parts(errors, warnings)
    }

    fn validate_segment(&self, segment: &RouteSegment, index: usize) -> Vec<String> {
        let mut errors = Vec::new();
        let prefix = format!("Segment {}:", index + 1);

        let hub_departer = present(&segment.hub_departer);
        let hub_destination = present(&segment.hub_destination);
        let departure_time = present(&segment.departure_time);
        let arrival_time = present(&segment.arrival_time);

        for (field, value) in [
            ("hub_departer", hub_departer),
            ("hub_destination", hub_destination),
            ("departure_time", departure_time),
            ("arrival_time", arrival_time),
        ] {
            if value.is_none() {
                errors.push(format!("{prefix} {field} is required"));
            }
        }

        if departure_time.is_some_and(|time| !is_valid_time(time)) {
            errors.push(format!("{prefix} Invalid departure_time format (expected HH:MM:SS)"));
        }
        if arrival_time.is_some_and(|time| !is_valid_time(time)) {
            errors.push(format!("{prefix} Invalid arrival_time format (expected HH:MM:SS)"));
        }

        if let Some(day_offset) = segment.day_offset {
            if !VALID_DAY_OFFSETS.contains(&day_offset) {
                errors.push(format!("{prefix} day_offset must be 0, 1, or 2"));
            }
        }

        if let Some(note) = present(&segment.note) {
            if !VALID_NOTES.iter().any(|valid| *valid == note) {
                errors.push(format!("{prefix} Invalid note value (expected D, D+1, or D+2)"));
            }
        }

        if let Some(name) = hub_departer {
            if !self.hub_exists(name) {
                errors.push(format!("{prefix} Hub departer '{name}' not found in database"));
            }
        }
        if let Some(name) = hub_destination {
            if !self.hub_exists(name) {
                errors.push(format!("{prefix} Hub destination '{name}' not found in database"));
            }
        }

        errors
    }

    /// A failed lookup counts as "not found".
    fn hub_exists(&self, name: &str) -> bool {
        self.hubs.hub_exists(name).unwrap_or_else(|err| {
            warn!(hub = name, error = %err, "hub lookup failed");
            false
        })
    }

    fn check_timing_conflicts(&self, route_name: &str, segments: &[RouteSegment]) -> Vec<String> {
        let mut warnings = Vec::new();

        for segment in segments {
            let (Some(hub), Some(time)) =
                (present(&segment.hub_departer), present(&segment.departure_time))
            else {
                continue;
            };

            match self.schedules.conflicting_schedules(hub, time, route_name) {
                Ok(existing) if !existing.is_empty() => warnings.push(format!(
                    "Timing conflict: {hub} already has {} route(s) departing at {time}",
                    existing.len()
                )),
                Ok(_) => {}
                Err(err) => warn!(hub, time, error = %err, "schedule lookup failed"),
            }
        }

        warnings
    }
}

impl<H, S> RouteValidator<H, S>
where
    H: HubDirectory + Sync,
    S: ScheduleStore + Sync,
{
    /// Validate many routes in parallel; results keep the input order.
    pub fn validate_routes(&self, routes: &[(String, Vec<RouteSegment>)]) -> Vec<ValidationResult> {
        routes
            .par_iter()
            .map(|(route_name, segments)| self.validate_route(route_name, segments))
            .collect()
    }
}

/// Adjacent legs leaving the same hub on the same day must not overlap.
fn check_logical_sequence(segments: &[RouteSegment]) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, pair) in segments.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        if current.hub_departer != next.hub_departer || current.day_offset != next.day_offset {
            continue;
        }

        let (Some(arrival), Some(departure)) = (
            minutes_of(&current.arrival_time),
            minutes_of(&next.departure_time),
        ) else {
            continue;
        };

        if arrival > departure {
            warnings.push(format!(
                "Sequence warning: Segment {} arrives at {} but segment {} departs at {}",
                index + 1,
                current.arrival_time.as_deref().unwrap_or_default(),
                index + 2,
                next.departure_time.as_deref().unwrap_or_default(),
            ));
        }
    }

    warnings
}

fn check_day_offset_consistency(segments: &[RouteSegment]) -> Vec<String> {
    let mut warnings = Vec::new();

    for segment in segments {
        let day_offset = segment.day_offset.unwrap_or(0);

        let crosses_midnight = matches!(
            (minutes_of(&segment.departure_time), minutes_of(&segment.arrival_time)),
            (Some(departure), Some(arrival)) if arrival < departure
        );

        if crosses_midnight && day_offset == 0 {
            warnings.push(format!(
                "Day offset warning: {} → {} arrives before departure time but day_offset is 0 (should be 1)",
                segment.hub_departer.as_deref().unwrap_or_default(),
                segment.hub_destination.as_deref().unwrap_or_default(),
            ));
        }

        // A midnight-crossing leg tagged day 0 is really a day 1 leg.
        let implied_offset = if crosses_midnight && day_offset == 0 { 1 } else { day_offset };

        if let Some(note) = present(&segment.note) {
            let expected = expected_note(implied_offset);
            if note != expected && note != format!("Ngày {expected}") {
                warnings.push(format!(
                    "Note inconsistency: day_offset is {day_offset} but note is '{note}' (expected '{expected}')"
                ));
            }
        }
    }

    warnings
}

/// Offsets beyond 1 all map to `D+2`.
fn expected_note(day_offset: i32) -> &'static str {
    match day_offset {
        0 => "D",
        1 => "D+1",
        _ => "D+2",
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Missing times count as midnight; unparseable ones yield `None`.
fn minutes_of(field: &Option<String>) -> Option<u32> {
    match present(field) {
        Some(time) => time_to_minutes(time),
        None => Some(0),
    }
}

/// True for `H:MM:SS` / `HH:MM:SS` with hour 0-23.
pub fn is_valid_time(time: &str) -> bool {
    TIME_FORMAT.is_match(time)
}

/// Minutes since midnight (`hours * 60 + minutes`); seconds are ignored.
///
/// An empty component reads as zero, so `":30:00"` is 30.
pub fn time_to_minutes(time: &str) -> Option<u32> {
    let mut parts = time.split(':');
    let hours = time_component(parts.next()?)?;
    let minutes = time_component(parts.next()?)?;
    hours.checked_mul(60)?.checked_add(minutes)
}

fn time_component(part: &str) -> Option<u32> {
    match part.trim() {
        "" => Some(0),
        digits => digits.parse().ok(),
    }
}
