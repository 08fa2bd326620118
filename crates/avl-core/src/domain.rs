use avl_geo::{Coordinate, RangeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AvlResult;
use crate::time::ReportedTimestamp;

/// A single GPS fix from the tracked asset, already range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationReport {
    pub coordinate: Coordinate,
    pub timestamp: Option<ReportedTimestamp>,
}

impl LocationReport {
    pub fn new(
        lat: f64,
        lon: f64,
        timestamp: Option<ReportedTimestamp>,
    ) -> Result<Self, RangeError> {
        Ok(Self {
            coordinate: Coordinate::new(lat, lon)?,
            timestamp,
        })
    }

    /// Builds a report from raw wire values, parsing the timestamp if present.
    pub fn parse(lat: f64, lon: f64, timestamp: Option<&str>) -> AvlResult<Self> {
        let timestamp = timestamp.map(ReportedTimestamp::parse).transpose()?;
        Ok(Self::new(lat, lon, timestamp)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceEvent {
    #[default]
    None,
    Enter,
    Exit,
}

impl GeofenceEvent {
    /// `previous` is the inside flag remembered before this report; `None` means no baseline yet.
    pub fn from_transition(previous: Option<bool>, inside: bool) -> Self {
        match (previous, inside) {
            (Some(false), true) => Self::Enter,
            (Some(true), false) => Self::Exit,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Enter => "enter",
            Self::Exit => "exit",
        }
    }

    pub fn is_transition(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleStateSnapshot {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ts: Option<DateTime<Utc>>,
    pub inside: bool,
    pub distance_m: Option<f64>,
    pub event: GeofenceEvent,
    pub last_update_age_s: Option<f64>,
}
