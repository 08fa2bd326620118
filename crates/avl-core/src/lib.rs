pub mod domain;
pub mod error;
pub mod time;

pub use domain::{GeofenceEvent, LocationReport, VehicleStateSnapshot};
pub use error::{AvlError, AvlResult, ErrorCode};
pub use time::{Clock, ReportedTimestamp, SystemClock, normalize_timestamp, seconds_between};
