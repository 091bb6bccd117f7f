//! User administration endpoints, all behind authentication plus a guard

use serde::Deserialize;
use warp::{Filter, Rejection, Reply};

use crate::auth::guard::Guards;
use crate::auth::identity::Identity;
use crate::constants::ADMIN_ROLE;
use crate::error::AuthError;
use crate::handlers::filters::{authorized, json_body, with_state, AppState};

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    #[serde(rename = "roleId")]
    pub role_id: Option<i64>,
}

/// `GET /api/users`, `GET /api/users/:id`, `POST /api/users/:id/roles`,
/// `DELETE /api/users/:id/roles/:role_id`
pub fn routes(state: AppState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let can_read = Guards::new().require_permission("users", "read");
    let is_admin = Guards::new().require_role([ADMIN_ROLE]);

    let list = warp::path!("api" / "users")
        .and(warp::get())
        .and(authorized(state.clone(), can_read.clone()))
        .and(with_state(state.clone()))
        .and_then(list_users);

    let get = warp::path!("api" / "users" / i64)
        .and(warp::get())
        .and(authorized(state.clone(), can_read))
        .and(with_state(state.clone()))
        .and_then(get_user);

    let assign = warp::path!("api" / "users" / i64 / "roles")
        .and(warp::post())
        .and(authorized(state.clone(), is_admin.clone()))
        .and(json_body::<AssignRoleRequest>())
        .and(with_state(state.clone()))
        .and_then(assign_role);

    let remove = warp::path!("api" / "users" / i64 / "roles" / i64)
        .and(warp::delete())
        .and(authorized(state.clone(), is_admin))
        .and(with_state(state))
        .and_then(remove_role);

    list.or(get).or(assign).or(remove)
}

async fn list_users(_caller: Identity, state: AppState) -> Result<impl Reply, Rejection> {
    let users = state.registry.list_users().await.map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&serde_json::json!({ "users": users })))
}

async fn get_user(id: i64, _caller: Identity, state: AppState) -> Result<impl Reply, Rejection> {
    let user = state
        .registry
        .get_user(id)
        .await
        .map_err(warp::reject::custom)?
        .ok_or_else(|| warp::reject::custom(AuthError::NotFound("User not found".to_string())))?;

    Ok(warp::reply::json(&serde_json::json!({ "user": user })))
}

async fn assign_role(
    user_id: i64,
    caller: Identity,
    body: AssignRoleRequest,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let role_id = match body.role_id {
        Some(id) if id > 0 => id,
        _ => {
            return Err(warp::reject::custom(AuthError::Validation(
                "Invalid user ID or role ID".to_string(),
            )))
        }
    };

    state
        .registry
        .assign_role(user_id, role_id)
        .await
        .map_err(warp::reject::custom)?;
    log::info!("Subject {} assigned role {} to user {}", caller.subject_id(), role_id, user_id);

    Ok(warp::reply::json(&serde_json::json!({ "message": "Role assigned successfully" })))
}

async fn remove_role(
    user_id: i64,
    role_id: i64,
    caller: Identity,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    state
        .registry
        .remove_role(user_id, role_id)
        .await
        .map_err(warp::reject::custom)?;
    log::info!("Subject {} removed role {} from user {}", caller.subject_id(), role_id, user_id);

    Ok(warp::reply::json(&serde_json::json!({ "message": "Role removed successfully" })))
}
