//! Registration, login and current-identity endpoints

use serde::Deserialize;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::identity::Identity;
use crate::handlers::filters::{authenticated, json_body, with_state, AppState};

/// Body of register and login requests. Missing fields become empty strings
/// so the flow can answer with its own validation message.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/register`, `POST /api/auth/login`, `GET /api/auth/me`
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let register = warp::path!("api" / "auth" / "register")
        .and(warp::post())
        .and(json_body::<CredentialsRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_register);

    let login = warp::path!("api" / "auth" / "login")
        .and(warp::post())
        .and(json_body::<CredentialsRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_login);

    let me = warp::path!("api" / "auth" / "me")
        .and(warp::get())
        .and(authenticated(state.resolver))
        .map(handle_me);

    register.or(login).or(me)
}

async fn handle_register(
    body: CredentialsRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let tokens = state
        .auth
        .register(&body.email, &body.password)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::with_status(warp::reply::json(&tokens), StatusCode::CREATED))
}

async fn handle_login(body: CredentialsRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let tokens = state
        .auth
        .login(&body.email, &body.password)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&tokens))
}

fn handle_me(identity: Identity) -> impl Reply {
    warp::reply::json(&serde_json::json!({ "user": identity }))
}
