use avl_config::{AppConfig, ServiceConfig};
use avl_state::VehicleStateStore;

pub struct AppState {
    pub config: ServiceConfig,
    pub app: AppConfig,
    pub store: VehicleStateStore,
}

#[cfg(test)]
pub fn test_state() -> actix_web::web::Data<AppState> {
    use avl_config::GeofenceConfig;

    let geofence = GeofenceConfig::default()
        .definition()
        .expect("default geofence is valid");
    actix_web::web::Data::new(AppState {
        config: ServiceConfig::from_env("avl-api-test"),
        app: AppConfig::default(),
        store: VehicleStateStore::new(geofence),
    })
}
