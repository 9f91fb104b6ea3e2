//! End-to-end tests for the register/login/logout flows and the dashboard
//! user API.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use almara_server::{Config, ServerState, build_router};

async fn test_app() -> Router {
    let config = Config::with_overrides(":memory:", 0);
    let state = ServerState::initialize(&config).await.unwrap();
    build_router(state)
}

/// JSON request that also declares a JSON preference (AJAX path).
fn ajax_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:3000")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn register_payload(email: &str) -> Value {
    json!({
        "name": "Ana García",
        "email": email,
        "password": "Sup3rSecret!",
        "confirmPassword": "Sup3rSecret!",
        "whatsapp": "+54911555000"
    })
}

#[tokio::test]
async fn register_establishes_a_session_and_returns_the_envelope() {
    let app = test_app().await;

    let response = app
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("Ana@Example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("almara_sid="));
    assert!(cookie.contains("HttpOnly"));
    // plain registration: session cookie, no Max-Age
    assert!(!cookie.contains("Max-Age"));

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["redirectTo"], "/users/profile");
    // email is stored lowercased and the hash never leaves the server
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_collects_every_validation_failure() {
    let app = test_app().await;

    let response = app
        .oneshot(ajax_request("POST", "/users/register", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    // name, email, password and confirmation all missing
    assert!(errors.len() >= 4);
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("A@b.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("a@B.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let msgs: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap())
        .collect();
    assert!(msgs.iter().any(|m| m.contains("already exists")));
}

#[tokio::test]
async fn failed_logins_are_indistinguishable() {
    let app = test_app().await;

    app.clone()
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("ana@example.com"),
        ))
        .await
        .unwrap();

    let wrong_password = app
        .clone()
        .oneshot(ajax_request(
            "POST",
            "/users/login",
            json!({ "email": "ana@example.com", "password": "WrongPass1!" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .clone()
        .oneshot(ajax_request(
            "POST",
            "/users/login",
            json!({ "email": "nobody@example.com", "password": "WrongPass1!" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    // byte-identical bodies: no email enumeration
    assert_eq!(
        body_bytes(wrong_password).await,
        body_bytes(unknown_email).await
    );
}

#[tokio::test]
async fn remember_flag_extends_the_cookie() {
    let app = test_app().await;

    app.clone()
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("ana@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(ajax_request(
            "POST",
            "/users/login",
            json!({ "email": "ana@example.com", "password": "Sup3rSecret!", "remember": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    // 30 days
    assert!(cookie.contains("Max-Age=2592000"));

    let response = app
        .oneshot(ajax_request(
            "POST",
            "/users/login",
            json!({ "email": "ana@example.com", "password": "Sup3rSecret!" }),
        ))
        .await
        .unwrap();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(!cookie.contains("Max-Age"));
}

#[tokio::test]
async fn the_profile_page_is_gated_and_logout_clears_the_session() {
    let app = test_app().await;

    // guest: bounced to the login page
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/profile")
                .header(header::HOST, "localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/users/login");

    // register, then log out with the issued cookie
    let response = app
        .clone()
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("ana@example.com"),
        ))
        .await
        .unwrap();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/logout")
                .header(header::HOST, "localhost:3000")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    // the old cookie no longer opens the profile
    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/profile")
                .header(header::HOST, "localhost:3000")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/users/login");
}

#[tokio::test]
async fn dashboard_user_api_paginates_and_strips_the_hash() {
    let app = test_app().await;

    app.clone()
        .oneshot(ajax_request(
            "POST",
            "/users/register",
            register_payload("ana@example.com"),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users?page=1")
                .header(header::HOST, "localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], Value::Null);
    let user = &body["users"][0];
    assert_eq!(user["email"], "ana@example.com");
    assert!(
        user["detail"]
            .as_str()
            .unwrap()
            .starts_with("http://localhost:3000/api/users/")
    );

    let id = user["id"].as_i64().unwrap();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/users/{id}"))
                .header(header::HOST, "localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["avatarUrl"], Value::Null);
    assert_eq!(body["whatsapp"], "+54911555000");
}
