mod routes;
mod state;

use actix_web::middleware::Condition;
use actix_web::{web, App, HttpServer};
use avl_config::{AppConfig, GeofenceConfig, ServiceConfig};
use avl_observability::{init, log_startup, ObservabilityConfig};
use avl_state::VehicleStateStore;
use std::io;

use crate::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ServiceConfig::from_env("avl-api");
    let obs_config = ObservabilityConfig {
        service_name: config.service_name.clone(),
        environment: config.environment.to_string(),
        log_level: config.log_level.clone(),
        metrics_addr: config.metrics_addr.clone(),
    };
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config.environment);

    let geofence = GeofenceConfig::from_env().definition().map_err(|err| {
        tracing::error!(error = %err, "Invalid geofence configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err)
    })?;
    tracing::info!(
        center_lat = geofence.center_lat(),
        center_lon = geofence.center_lon(),
        radius_m = geofence.radius_m(),
        "Geofence configured"
    );

    let app = AppConfig::from_env();
    let allow_all_cors = app.allow_all_cors;
    let bind_addr = config.bind_addr.clone();
    let shared_state = web::Data::new(AppState {
        config,
        app,
        store: VehicleStateStore::new(geofence),
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(allow_all_cors, routes::cors::permissive_headers()))
            .app_data(shared_state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
