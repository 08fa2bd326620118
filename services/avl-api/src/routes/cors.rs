use actix_web::middleware::DefaultHeaders;
use actix_web::{options, HttpResponse};

pub fn permissive_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "*"))
}

#[options("/{tail:.*}")]
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn preflight_carries_cors_headers() {
        let app = test::init_service(
            App::new()
                .wrap(permissive_headers())
                .app_data(crate::state::test_state())
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/location")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[actix_web::test]
    async fn regular_responses_carry_cors_headers() {
        let app = test::init_service(
            App::new()
                .wrap(permissive_headers())
                .app_data(crate::state::test_state())
                .configure(crate::routes::configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/state").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("access-control-allow-methods"));
    }
}
