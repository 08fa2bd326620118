use actix_web::{get, web, HttpResponse};
use avl_geo::GeofenceDefinition;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct GeofenceResponse {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
}

impl From<&GeofenceDefinition> for GeofenceResponse {
    fn from(definition: &GeofenceDefinition) -> Self {
        Self {
            center_lat: definition.center_lat(),
            center_lon: definition.center_lon(),
            radius_m: definition.radius_m(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    geofence: GeofenceResponse,
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        geofence: state.store.geofence().into(),
    })
}
