use actix_web::{get, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Missing this many expected updates in a row marks the feed as stale.
const STALE_AFTER_PERIODS: f64 = 3.0;

#[derive(Debug, Serialize, Deserialize)]
struct StatusResponse {
    service: String,
    environment: String,
    region: Option<String>,
    expected_update_period_s: f64,
    last_update_age_s: Option<f64>,
    stale: bool,
    timestamp: DateTime<Utc>,
}

fn is_stale(last_update_age_s: Option<f64>, expected_update_period_s: f64) -> bool {
    match last_update_age_s {
        Some(age) => age > expected_update_period_s * STALE_AFTER_PERIODS,
        None => true,
    }
}

#[get("/v1/status")]
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.store.get_state();
    let period = state.app.expected_update_period_s;
    let response = StatusResponse {
        service: state.config.service_name.clone(),
        environment: state.config.environment.to_string(),
        region: state.config.region.clone(),
        expected_update_period_s: period,
        last_update_age_s: snapshot.last_update_age_s,
        stale: is_stale(snapshot.last_update_age_s, period),
        timestamp: Utc::now(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::test::{TestRequest, call_and_read_body_json, call_service, init_service};
    use serde_json::json;

    #[test]
    fn staleness_threshold() {
        assert!(is_stale(None, 2.0));
        assert!(!is_stale(Some(6.0), 2.0));
        assert!(is_stale(Some(6.1), 2.0));
    }

    #[actix_web::test]
    async fn status_turns_fresh_after_a_report() {
        let app = init_service(
            App::new()
                .app_data(crate::state::test_state())
                .configure(crate::routes::configure),
        )
        .await;

        let status_req = || TestRequest::get().uri("/v1/status").to_request();
        let before: StatusResponse = call_and_read_body_json(&app, status_req()).await;
        assert!(before.stale);
        assert!(before.last_update_age_s.is_none());
        assert_eq!(before.service, "avl-api-test");

        let req = TestRequest::post()
            .uri("/location")
            .set_json(json!({"lat": 50.822949, "lon": 12.930395}))
            .to_request();
        call_service(&app, req).await;

        let after: StatusResponse = call_and_read_body_json(&app, status_req()).await;
        assert!(!after.stale);
        assert!(after.last_update_age_s.is_some());
    }
}
