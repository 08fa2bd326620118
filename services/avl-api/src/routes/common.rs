use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use avl_core::{AvlError, ErrorCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn internal_error(message: impl Into<String>) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: message.into(),
    })
}

pub fn error_response(err: &AvlError) -> HttpResponse {
    match err.code {
        ErrorCode::InvalidInput | ErrorCode::OutOfRange => bad_request(err.message.clone()),
        ErrorCode::Internal => internal_error(err.message.clone()),
    }
}

/// Malformed JSON bodies get the same `{"error": ...}` shape as other rejections.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}
