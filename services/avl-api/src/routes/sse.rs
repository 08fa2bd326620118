use actix_web::rt::time::interval;
use actix_web::web::Bytes;
use actix_web::{get, web, HttpResponse};
use avl_core::VehicleStateSnapshot;
use futures_util::stream::unfold;

use crate::state::AppState;

fn state_event(snapshot: &VehicleStateSnapshot, counter: u64) -> serde_json::Result<Bytes> {
    let data = serde_json::to_string(snapshot)?;
    Ok(Bytes::from(format!("id: {counter}\nevent: state\ndata: {data}\n\n")))
}

/// Pushes the current snapshot once per expected update period.
#[get("/v1/stream/state")]
pub async fn state_stream(state: web::Data<AppState>) -> HttpResponse {
    let interval = interval(state.app.update_period());
    let stream = unfold(
        (interval, state, 0u64),
        |(mut interval, state, counter)| async move {
            interval.tick().await;
            let item = state_event(&state.store.get_state(), counter).map_err(|err| {
                tracing::warn!(error = %err, "Failed to encode state event");
                actix_web::error::ErrorInternalServerError(err)
            });
            Some((item, (interval, state, counter + 1)))
        },
    );

    HttpResponse::Ok()
        .insert_header(("Content-Type", "text/event-stream"))
        .insert_header(("Cache-Control", "no-cache"))
        .insert_header(("Connection", "keep-alive"))
        .streaming(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_service, init_service};
    use avl_core::GeofenceEvent;

    #[test]
    fn event_frame_wraps_snapshot_json() {
        let snapshot = VehicleStateSnapshot {
            lat: Some(50.0),
            lon: Some(12.0),
            inside: true,
            distance_m: Some(3.5),
            event: GeofenceEvent::Enter,
            ..VehicleStateSnapshot::default()
        };
        let frame = state_event(&snapshot, 7).unwrap();
        let text = std::str::from_utf8(&frame).unwrap();

        assert!(text.starts_with("id: 7\nevent: state\ndata: {"));
        assert!(text.ends_with("}\n\n"));
        assert!(text.contains("\"event\":\"enter\""));
    }

    #[actix_web::test]
    async fn stream_responds_with_event_stream() {
        let app = init_service(
            App::new()
                .app_data(crate::state::test_state())
                .configure(crate::routes::configure),
        )
        .await;
        let req = TestRequest::get().uri("/v1/stream/state").to_request();
        let resp = call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "text/event-stream");
    }
}
