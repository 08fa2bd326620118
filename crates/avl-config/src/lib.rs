use avl_geo::{Coordinate, GeofenceDefinition, RangeError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{env, fmt};

pub const DEFAULT_CENTER_LAT: f64 = 50.822949;
pub const DEFAULT_CENTER_LON: f64 = 12.930395;
pub const DEFAULT_RADIUS_M: f64 = 50.0;
pub const DEFAULT_EXPECTED_UPDATE_PERIOD_S: f64 = 2.0;
pub const MIN_UPDATE_PERIOD_S: f64 = 0.1;
pub const MAX_UPDATE_PERIOD_S: f64 = 3_600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Local,
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_env(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "local" => Self::Local,
            "dev" | "development" => Self::Dev,
            "test" | "testing" => Self::Test,
            "staging" => Self::Staging,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Prod => "prod",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub environment: Environment,
    pub region: Option<String>,
    pub bind_addr: String,
    pub metrics_addr: Option<String>,
    pub log_level: String,
}

impl ServiceConfig {
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    fn from_lookup(default_service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: lookup("AVL_SERVICE_NAME")
                .unwrap_or_else(|| default_service_name.to_string()),
            environment: Environment::from_env(
                &lookup("AVL_ENV").unwrap_or_else(|| "local".to_string()),
            ),
            region: lookup("AVL_REGION"),
            bind_addr: lookup("AVL_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            metrics_addr: lookup("AVL_METRICS_ADDR"),
            log_level: lookup("AVL_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        }
    }
}

/// Raw fence settings. Validated into a [`GeofenceDefinition`] at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeofenceConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            center_lat: DEFAULT_CENTER_LAT,
            center_lon: DEFAULT_CENTER_LON,
            radius_m: DEFAULT_RADIUS_M,
        }
    }
}

impl GeofenceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            center_lat: parse_f64(lookup("AVL_GEOFENCE_CENTER_LAT"), defaults.center_lat),
            center_lon: parse_f64(lookup("AVL_GEOFENCE_CENTER_LON"), defaults.center_lon),
            radius_m: parse_f64(lookup("AVL_GEOFENCE_RADIUS_M"), defaults.radius_m),
        }
    }

    pub fn definition(&self) -> Result<GeofenceDefinition, RangeError> {
        GeofenceDefinition::new(Coordinate::new(self.center_lat, self.center_lon)?, self.radius_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub expected_update_period_s: f64,
    pub allow_all_cors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            expected_update_period_s: DEFAULT_EXPECTED_UPDATE_PERIOD_S,
            allow_all_cors: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let period = parse_f64(
            lookup("AVL_EXPECTED_UPDATE_PERIOD_S"),
            defaults.expected_update_period_s,
        );
        Self {
            expected_update_period_s: if period > 0.0 {
                period.clamp(MIN_UPDATE_PERIOD_S, MAX_UPDATE_PERIOD_S)
            } else {
                defaults.expected_update_period_s
            },
            allow_all_cors: parse_bool(lookup("AVL_ALLOW_ALL_CORS"), defaults.allow_all_cors),
        }
    }

    /// Expected update period as a non-zero `Duration`.
    pub fn update_period(&self) -> Duration {
        let seconds = if self.expected_update_period_s.is_finite() {
            self.expected_update_period_s
                .clamp(MIN_UPDATE_PERIOD_S, MAX_UPDATE_PERIOD_S)
        } else {
            DEFAULT_EXPECTED_UPDATE_PERIOD_S
        };
        Duration::from_secs_f64(seconds)
    }
}

fn parse_f64(value: Option<String>, default: f64) -> f64 {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn service_defaults() {
        let config = ServiceConfig::from_lookup("avl-api", lookup(&[]));
        assert_eq!(config.service_name, "avl-api");
        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.log_level, "info");
        assert!(config.metrics_addr.is_none());
    }

    #[test]
    fn service_overrides() {
        let config = ServiceConfig::from_lookup(
            "avl-api",
            lookup(&[
                ("AVL_ENV", "Production"),
                ("AVL_BIND_ADDR", "127.0.0.1:9000"),
                ("AVL_METRICS_ADDR", "127.0.0.1:9100"),
            ]),
        );
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.environment.to_string(), "prod");
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.metrics_addr.as_deref(), Some("127.0.0.1:9100"));
    }

    #[test]
    fn geofence_defaults_build_a_definition() {
        let definition = GeofenceConfig::from_lookup(lookup(&[])).definition().unwrap();
        assert_eq!(definition.center_lat(), DEFAULT_CENTER_LAT);
        assert_eq!(definition.center_lon(), DEFAULT_CENTER_LON);
        assert_eq!(definition.radius_m(), DEFAULT_RADIUS_M);
    }

    #[test]
    fn geofence_ignores_unparsable_values() {
        let config = GeofenceConfig::from_lookup(lookup(&[
            ("AVL_GEOFENCE_CENTER_LAT", "north"),
            ("AVL_GEOFENCE_RADIUS_M", " 120.5 "),
        ]));
        assert_eq!(config.center_lat, DEFAULT_CENTER_LAT);
        assert_eq!(config.radius_m, 120.5);
    }

    #[test]
    fn geofence_out_of_range_is_rejected() {
        let config = GeofenceConfig::from_lookup(lookup(&[("AVL_GEOFENCE_CENTER_LON", "181")]));
        assert_eq!(config.definition().unwrap_err().field, "lon");
    }

    #[test]
    fn app_config_parsing() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AVL_EXPECTED_UPDATE_PERIOD_S", "-3"),
            ("AVL_ALLOW_ALL_CORS", "off"),
        ]));
        assert_eq!(config.expected_update_period_s, DEFAULT_EXPECTED_UPDATE_PERIOD_S);
        assert!(!config.allow_all_cors);
    }

    #[test]
    fn update_period_is_clamped() {
        for (raw, expected) in [("1e-10", 0.1), ("1e300", 3_600.0), ("0.5", 0.5)] {
            let config = AppConfig::from_lookup(lookup(&[("AVL_EXPECTED_UPDATE_PERIOD_S", raw)]));
            assert_eq!(config.expected_update_period_s, expected, "{raw}");
            assert_eq!(config.update_period(), Duration::from_secs_f64(expected));
        }

        let hand_built = AppConfig {
            expected_update_period_s: 0.0,
            allow_all_cors: true,
        };
        assert_eq!(hand_built.update_period(), Duration::from_millis(100));
    }
}
