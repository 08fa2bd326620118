use actix_web::{get, post, web, HttpResponse};
use avl_core::{AvlResult, ErrorCode, LocationReport, ReportedTimestamp};
use serde::Deserialize;

use crate::routes::common::error_response;
use crate::state::AppState;

/// Body of `POST /location` as sent by the phone.
#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub ts: Option<WireTimestamp>,
}

/// Timestamps arrive either as ISO-8601 text or as Unix epoch numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Epoch(f64),
    Text(String),
}

impl WireTimestamp {
    fn parse(&self) -> AvlResult<ReportedTimestamp> {
        match self {
            Self::Epoch(seconds) => ReportedTimestamp::from_epoch(*seconds),
            Self::Text(text) => ReportedTimestamp::parse(text),
        }
    }
}

impl LocationPayload {
    fn into_report(self) -> AvlResult<LocationReport> {
        let timestamp = self.ts.as_ref().map(WireTimestamp::parse).transpose()?;
        Ok(LocationReport::new(self.lat, self.lon, timestamp)?)
    }
}

#[post("/location")]
pub async fn post_location(
    state: web::Data<AppState>,
    payload: web::Json<LocationPayload>,
) -> HttpResponse {
    let report = match payload.into_inner().into_report() {
        Ok(report) => report,
        Err(err) => {
            let reason = match err.code {
                ErrorCode::OutOfRange => "out_of_range",
                _ => "invalid_input",
            };
            metrics::counter!("avl_rejected_reports_total", "reason" => reason).increment(1);
            tracing::warn!(error = %err, "Rejected location report");
            return error_response(&err);
        }
    };

    HttpResponse::Ok().json(state.store.update_from_location(&report))
}

#[get("/state")]
pub async fn get_state(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.get_state())
}
