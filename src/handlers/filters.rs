//! Warp filters that put authentication and authorization in front of handlers

use std::convert::Infallible;
use std::sync::Arc;
use warp::http::header::AUTHORIZATION;
use warp::http::HeaderMap;
use warp::{Filter, Rejection};

use crate::auth::guard::Guards;
use crate::auth::identity::{Identity, IdentityResolver};
use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::error::Result;
use crate::storage::traits::{UserDirectory, UserRegistry};

/// Everything a handler may need, shared across requests
#[derive(Clone)]
pub struct AppState {
    pub resolver: IdentityResolver,
    pub auth: Arc<AuthService>,
    pub directory: Arc<dyn UserDirectory>,
    pub registry: Arc<dyn UserRegistry>,
}

impl AppState {
    pub fn new<D>(tokens: Arc<TokenService>, store: Arc<D>) -> Result<Self>
    where
        D: UserDirectory + UserRegistry + 'static,
    {
        let directory: Arc<dyn UserDirectory> = store.clone();
        let registry: Arc<dyn UserRegistry> = store;
        let auth = AuthService::new(tokens.clone(), directory.clone(), registry.clone())?;

        Ok(Self {
            resolver: IdentityResolver::new(tokens),
            auth: Arc::new(auth),
            directory,
            registry,
        })
    }
}

// Helper function to include app state in request
pub fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Require a valid bearer token; extracts the caller's [`Identity`]
pub fn authenticated(
    resolver: IdentityResolver,
) -> impl Filter<Extract = (Identity,), Error = Rejection> + Clone {
    warp::header::headers_cloned().and_then(move |headers: HeaderMap| {
        let resolver = resolver.clone();
        async move {
            // A non-ASCII header value is treated like a missing one
            let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
            resolver.resolve(authorization).map_err(warp::reject::custom)
        }
    })
}

/// Authenticate, then run every guard in `guards` before the handler
pub fn authorized(
    state: AppState,
    guards: Guards,
) -> impl Filter<Extract = (Identity,), Error = Rejection> + Clone {
    let directory = state.directory.clone();

    authenticated(state.resolver).and_then(move |identity: Identity| {
        let guards = guards.clone();
        let directory = directory.clone();
        async move {
            guards
                .authorize(Some(&identity), directory.as_ref())
                .await
                .map(|_| identity)
                .map_err(warp::reject::custom)
        }
    })
}

/// JSON body with a size cap
pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(16 * 1024).and(warp::body::json())
}
