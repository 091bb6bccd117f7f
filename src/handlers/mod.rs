//! Request handlers for the HTTP endpoints

pub mod auth;
pub mod filters;
pub mod rejection;
pub mod users;

use std::convert::Infallible;
use warp::{Filter, Reply};

pub use filters::{authenticated, authorized, AppState};
pub use rejection::handle_rejection;

/// `GET /health`
pub fn health() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    })
}

/// Every route of the service, with rejections rendered as JSON
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    health()
        .or(auth::routes(state.clone()))
        .or(users::routes(state))
        .recover(handle_rejection)
}
