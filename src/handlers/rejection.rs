//! Turns rejections into `{ "error", "message" }` JSON responses

use serde::Serialize;
use std::convert::Infallible;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{MethodNotAllowed, PayloadTooLarge};
use warp::{Rejection, Reply};

use crate::error::AuthError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, error, message) = if let Some(e) = err.find::<AuthError>() {
        if e.status_code().is_server_error() {
            log::error!("Request failed: {}", e);
        }
        (e.status_code(), e.label(), e.public_message())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found", "Route not found".to_string())
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "Validation Error", e.to_string())
    } else if err.find::<PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", "Request body too large".to_string())
    } else if err.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", "Method not allowed".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An unexpected error occurred".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { error, message }),
        status,
    ))
}
