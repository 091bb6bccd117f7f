mod common;

use std::sync::Arc;
use warp::http::StatusCode;
use warp::test::request;

use common::token_service;
use gatekeeper::handlers::{self, AppState};
use gatekeeper::storage::{MemoryUserDirectory, UserRegistry};

fn setup() -> (AppState, Arc<MemoryUserDirectory>) {
    let directory = Arc::new(MemoryUserDirectory::new());
    let state = AppState::new(token_service(), directory.clone()).unwrap();
    (state, directory)
}

fn body_json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

async fn register(state: &AppState, email: &str, password: &str) -> (i64, String) {
    let res = request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({ "email": email, "password": password }))
        .reply(&handlers::routes(state.clone()))
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = body_json(res.body());
    (
        body["user"]["id"].as_i64().unwrap(),
        body["accessToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let (state, _) = setup();
    let res = request().path("/health").reply(&handlers::routes(state)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let (state, directory) = setup();
    let res = request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({ "email": "ada@example.com", "password": "analytical" }))
        .reply(&handlers::routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res.body());
    assert!(body["accessToken"].as_str().unwrap().split('.').count() == 3);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"]["created_at"].is_string());
    assert!(body["user"]["updated_at"].is_string());
    assert!(body["user"].get("createdAt").is_none());
    assert!(body["user"].get("password_digest").is_none());

    // New accounts get the default role
    let id = body["user"]["id"].as_i64().unwrap();
    let user = directory.get_user(id).await.unwrap().unwrap();
    assert_eq!(user.roles.len(), 1);
    assert_eq!(user.roles[0].name, "user");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (state, _) = setup();
    register(&state, "dup@example.com", "password1").await;

    let res = request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({ "email": "dup@example.com", "password": "password2" }))
        .reply(&handlers::routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(res.body())["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_validation() {
    let (state, _) = setup();
    let routes = handlers::routes(state);

    let res = request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({ "email": "short@example.com", "password": "1234567" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = request()
        .method("POST")
        .path("/api/auth/register")
        .json(&serde_json::json!({ "password": "long enough" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let (state, _) = setup();
    let (id, _) = register(&state, "grace@example.com", "compiler1").await;
    let routes = handlers::routes(state);

    let res = request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({ "email": "grace@example.com", "password": "compiler1" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["user"]["id"].as_i64().unwrap(), id);
    assert!(body["accessToken"].is_string());
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let (state, _) = setup();
    register(&state, "grace@example.com", "compiler1").await;
    let routes = handlers::routes(state);

    let wrong_password = request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({ "email": "grace@example.com", "password": "compiler2" }))
        .reply(&routes)
        .await;
    let unknown_email = request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({ "email": "nobody@example.com", "password": "compiler1" }))
        .reply(&routes)
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body(), unknown_email.body());
}

#[tokio::test]
async fn test_me_requires_token() {
    let (state, _) = setup();
    let (id, token) = register(&state, "me@example.com", "password1").await;
    let routes = handlers::routes(state);

    let res = request().path("/api/auth/me").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res.body())["message"], "No token provided");

    let res = request()
        .path("/api/auth/me")
        .header("authorization", "Bearer not.a.token")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = request()
        .path("/api/auth/me")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["user"]["userId"].as_i64().unwrap(), id);
    assert_eq!(body["user"]["email"], "me@example.com");
}

#[tokio::test]
async fn test_user_listing_requires_permission() {
    let (state, directory) = setup();
    let (id, token) = register(&state, "plain@example.com", "password1").await;
    let routes = handlers::routes(state);

    let res = request()
        .path("/api/users")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Granting admin takes effect without a new token
    let admin = directory.role_id("admin").await.unwrap();
    directory.assign_role(id, admin).await.unwrap();

    let res = request()
        .path("/api/users")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let users = body_json(res.body())["users"].as_array().unwrap().clone();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "plain@example.com");
    assert!(users[0]["created_at"].is_string());

    let res = request()
        .path(&format!("/api/users/{}", id))
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["user"]["roles"].as_array().unwrap().len(), 2);

    let res = request()
        .path("/api/users/9999")
        .header("authorization", format!("Bearer {}", token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_management_is_admin_only() {
    let (state, directory) = setup();
    let (admin_id, admin_token) = register(&state, "root@example.com", "password1").await;
    let (user_id, user_token) = register(&state, "plain@example.com", "password1").await;
    let admin_role = directory.role_id("admin").await.unwrap();
    directory.assign_role(admin_id, admin_role).await.unwrap();
    let routes = handlers::routes(state);

    let res = request()
        .method("POST")
        .path(&format!("/api/users/{}/roles", user_id))
        .header("authorization", format!("Bearer {}", user_token))
        .json(&serde_json::json!({ "roleId": admin_role }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = request()
        .method("POST")
        .path(&format!("/api/users/{}/roles", user_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({}))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = request()
        .method("POST")
        .path(&format!("/api/users/{}/roles", user_id))
        .header("authorization", format!("Bearer {}", admin_token))
        .json(&serde_json::json!({ "roleId": admin_role }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["message"], "Role assigned successfully");

    let res = request()
        .method("DELETE")
        .path(&format!("/api/users/{}/roles/{}", user_id, admin_role))
        .header("authorization", format!("Bearer {}", admin_token))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res.body())["message"], "Role removed successfully");

    let roles = directory.get_user(user_id).await.unwrap().unwrap().roles;
    assert!(roles.iter().all(|r| r.name != "admin"));
}

#[tokio::test]
async fn test_directory_outage_is_server_error() {
    let (state, directory) = setup();
    let (_, token) = register(&state, "plain@example.com", "password1").await;
    directory.set_available(false);

    let res = request()
        .path("/api/users")
        .header("authorization", format!("Bearer {}", token))
        .reply(&handlers::routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = body_json(res.body())["message"].as_str().unwrap().to_string();
    assert!(!message.contains("offline"));
    assert_eq!(message, "User directory unavailable");
}

#[tokio::test]
async fn test_login_during_directory_outage() {
    let (state, directory) = setup();
    register(&state, "grace@example.com", "compiler1").await;
    directory.set_available(false);

    let res = request()
        .method("POST")
        .path("/api/auth/login")
        .json(&serde_json::json!({ "email": "grace@example.com", "password": "compiler1" }))
        .reply(&handlers::routes(state))
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(res.body())["message"], "User directory unavailable");
}

#[tokio::test]
async fn test_unknown_route() {
    let (state, _) = setup();
    let res = request().path("/api/nothing").reply(&handlers::routes(state)).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
