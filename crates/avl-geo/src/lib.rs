use serde::Serialize;
use std::fmt;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeError {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl RangeError {
    fn check(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, Self> {
        if value.is_finite() && value >= min && value <= max {
            Ok(value)
        } else {
            Err(Self {
                field,
                value,
                min,
                max,
            })
        }
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be within [{}, {}], got {}",
            self.field, self.min, self.max, self.value
        )
    }
}

impl std::error::Error for RangeError {}

/// A WGS84 position in degrees. Only constructible with in-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RangeError> {
        Ok(Self {
            latitude: RangeError::check("lat", latitude, LATITUDE_RANGE)?,
            longitude: RangeError::check("lon", longitude, LONGITUDE_RANGE)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Great-circle distance in meters between two points given in degrees.
///
/// Inputs are not validated.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_r = lat1.to_radians();
    let lat2_r = lat2.to_radians();
    let dlat = lat2_r - lat1_r;
    let dlon = lon2.to_radians() - lon1.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_r.cos() * lat2_r.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeofenceEvaluation {
    pub inside: bool,
    pub distance_m: f64,
}

/// Circular fence: a center and a radius in meters. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceDefinition {
    center: Coordinate,
    radius_m: f64,
}

impl GeofenceDefinition {
    pub fn new(center: Coordinate, radius_m: f64) -> Result<Self, RangeError> {
        let radius_m = RangeError::check("radius_m", radius_m, (0.0, f64::INFINITY))?;
        Ok(Self { center, radius_m })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn center_lat(&self) -> f64 {
        self.center.latitude
    }

    pub fn center_lon(&self) -> f64 {
        self.center.longitude
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// The boundary itself counts as inside.
    pub fn evaluate(&self, point: &Coordinate) -> GeofenceEvaluation {
        let distance_m = point.distance_to(&self.center);
        GeofenceEvaluation {
            inside: distance_m <= self.radius_m,
            distance_m,
        }
    }
}
