//! In-memory state for the single tracked vehicle.
//!
//! One record lives behind one mutex. Every update and every read takes the
//! lock, so callers only ever see the record as a whole, never half-written.
//! Updates are applied in lock-acquisition order; reports are not reordered
//! by their own timestamps.

use avl_core::{
    Clock, GeofenceEvent, LocationReport, SystemClock, VehicleStateSnapshot, normalize_timestamp,
    seconds_between,
};
use avl_geo::{Coordinate, GeofenceDefinition};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, Default)]
struct VehicleState {
    coordinate: Option<Coordinate>,
    ts: Option<DateTime<Utc>>,
    inside: bool,
    distance_m: Option<f64>,
    event: GeofenceEvent,
    /// Baseline for transition detection; `None` until the first report.
    prev_inside: Option<bool>,
}

impl VehicleState {
    fn snapshot(&self, now: DateTime<Utc>) -> VehicleStateSnapshot {
        VehicleStateSnapshot {
            lat: self.coordinate.map(|c| c.latitude()),
            lon: self.coordinate.map(|c| c.longitude()),
            ts: self.ts,
            inside: self.inside,
            distance_m: self.distance_m,
            event: self.event,
            last_update_age_s: self.ts.map(|ts| seconds_between(ts, now)),
        }
    }
}

pub struct VehicleStateStore<C: Clock = SystemClock> {
    geofence: GeofenceDefinition,
    clock: C,
    state: Mutex<VehicleState>,
}

impl VehicleStateStore<SystemClock> {
    pub fn new(geofence: GeofenceDefinition) -> Self {
        Self::with_clock(geofence, SystemClock)
    }
}

impl<C: Clock> VehicleStateStore<C> {
    pub fn with_clock(geofence: GeofenceDefinition, clock: C) -> Self {
        Self {
            geofence,
            clock,
            state: Mutex::new(VehicleState::default()),
        }
    }

    pub fn geofence(&self) -> &GeofenceDefinition {
        &self.geofence
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Applies a report and returns the resulting state.
    ///
    /// The event compares the new inside flag with the flag remembered from
    /// the previous report. All derived values are computed before the record
    /// is replaced in a single assignment.
    pub fn update_from_location(&self, report: &LocationReport) -> VehicleStateSnapshot {
        let evaluation = self.geofence.evaluate(&report.coordinate);

        let mut state = self.lock();
        let now = self.clock.now();
        let ts = normalize_timestamp(report.timestamp.as_ref(), now);
        let event = GeofenceEvent::from_transition(state.prev_inside, evaluation.inside);

        *state = VehicleState {
            coordinate: Some(report.coordinate),
            ts: Some(ts),
            inside: evaluation.inside,
            distance_m: Some(evaluation.distance_m),
            event,
            prev_inside: Some(evaluation.inside),
        };
        let snapshot = state.snapshot(now);
        drop(state);

        metrics::counter!("avl_location_reports_total").increment(1);
        tracing::debug!(
            lat = report.coordinate.latitude(),
            lon = report.coordinate.longitude(),
            distance_m = evaluation.distance_m,
            inside = evaluation.inside,
            "Location report applied"
        );
        if event.is_transition() {
            metrics::counter!("avl_geofence_transitions_total", "event" => event.as_str())
                .increment(1);
            tracing::info!(
                event = event.as_str(),
                distance_m = evaluation.distance_m,
                radius_m = self.geofence.radius_m(),
                "Geofence transition"
            );
        }

        snapshot
    }

    pub fn get_state(&self) -> VehicleStateSnapshot {
        let state = self.lock();
        state.snapshot(self.clock.now())
    }

    // The record is only written by whole assignment, so a poisoned lock
    // still guards a consistent value.
    fn lock(&self) -> MutexGuard<'_, VehicleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> fmt::Debug for VehicleStateStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleStateStore")
            .field("geofence", &self.geofence)
            .field("state", &*self.lock())
            .finish()
    }
}
