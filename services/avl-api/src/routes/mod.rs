pub mod common;
pub mod cors;
pub mod health;
pub mod location;
pub mod sse;
pub mod status;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(common::json_config())
        .service(health::health)
        .service(location::post_location)
        .service(location::get_state)
        .service(status::status)
        .service(sse::state_stream)
        .service(cors::preflight);
}
