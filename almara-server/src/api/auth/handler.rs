//! Auth Handlers
//!
//! Register, login and logout for the browser flows. Responses are
//! content-negotiated: AJAX callers (Accept: application/json or the XHR
//! header) get a JSON envelope, plain forms get a redirect. Both carry the
//! session cookie.

use std::path::Path as FsPath;
use std::time::Duration;

use axum::{
    Form, Json, RequestExt,
    extract::{Multipart, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::api::auth::avatar::{AvatarUpload, save_avatar};
use crate::auth::password;
use crate::auth::session::{clear_cookie, session_cookie, session_id_from_headers};
use crate::core::{Config, ServerState};
use crate::db::repository::user;
use crate::utils::validation::{
    FieldErrors, MIN_PASSWORD_LEN, MIN_USER_NAME_LEN, email_ok, password_complexity_ok,
    upload_ext_ok,
};
use crate::utils::{AppError, AppResult};
use shared::models::{RememberFlag, SessionUser, UserLogin, UserRegister};

/// Fixed delay before a login outcome is revealed; keeps lookup and verify
/// timing from leaking which step failed.
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Where successful register/login lands.
const PROFILE_PATH: &str = "/users/profile";

// ── Views ───────────────────────────────────────────────────────────

async fn serve_view(config: &Config, file: &str) -> Response {
    let path = FsPath::new(&config.views_dir).join(file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Html(bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /users/register
pub async fn show_register(State(state): State<ServerState>) -> Response {
    serve_view(&state.config, "users/register.html").await
}

/// GET /users/login
pub async fn show_login(State(state): State<ServerState>) -> Response {
    serve_view(&state.config, "users/login.html").await
}

/// GET /users/profile
pub async fn show_profile(State(state): State<ServerState>) -> Response {
    serve_view(&state.config, "users/profile.html").await
}

// ── Content negotiation ─────────────────────────────────────────────

/// Whether the caller wants a JSON envelope rather than a redirect.
fn wants_json(headers: &HeaderMap) -> bool {
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"));
    let is_xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    accepts_json || is_xhr
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthSuccess {
    success: bool,
    redirect_to: &'static str,
    user: SessionUser,
}

/// Establish the session and answer with either the JSON envelope or a
/// redirect, always setting the cookie.
fn auth_success(
    state: &ServerState,
    headers: &HeaderMap,
    user: SessionUser,
    remember: bool,
) -> Response {
    let session_id = state.sessions.insert(user.clone(), remember);
    let cookie = session_cookie(&session_id, remember);

    if wants_json(headers) {
        (
            [(header::SET_COOKIE, cookie)],
            Json(AuthSuccess {
                success: true,
                redirect_to: PROFILE_PATH,
                user,
            }),
        )
            .into_response()
    } else {
        ([(header::SET_COOKIE, cookie)], Redirect::to(PROFILE_PATH)).into_response()
    }
}

// ── Body parsing ────────────────────────────────────────────────────

fn content_type(req: &Request) -> String {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Parse a JSON or urlencoded body into `T`.
async fn parse_body<T>(req: Request) -> AppResult<T>
where
    T: serde::de::DeserializeOwned + 'static,
{
    if content_type(&req).starts_with("application/json") {
        let Json(value) = req
            .extract::<Json<T>, _>()
            .await
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;
        Ok(value)
    } else {
        let Form(value) = req
            .extract::<Form<T>, _>()
            .await
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;
        Ok(value)
    }
}

/// Parse the register request: JSON/urlencoded, or multipart when the form
/// carries an avatar file.
async fn parse_register(req: Request) -> AppResult<(UserRegister, Option<AvatarUpload>)> {
    if !content_type(&req).starts_with("multipart/form-data") {
        let payload = parse_body::<UserRegister>(req).await?;
        return Ok((payload, None));
    }

    let mut multipart = req
        .extract::<Multipart, _>()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?;

    let mut payload = UserRegister::default();
    let mut avatar = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "avatar" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid upload: {e}")))?
                    .to_vec();
                // an empty file input still submits an empty part
                if !original_name.is_empty() && !data.is_empty() {
                    avatar = Some(AvatarUpload {
                        original_name,
                        data,
                    });
                }
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid field: {e}")))?;
                match other {
                    "name" => payload.name = Some(value),
                    "email" => payload.email = Some(value),
                    "password" => payload.password = Some(value),
                    "confirmPassword" => payload.confirm_password = Some(value),
                    "whatsapp" => payload.whatsapp = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok((payload, avatar))
}

// ── Actions ─────────────────────────────────────────────────────────

/// POST /users/register
pub async fn register(
    State(state): State<ServerState>,
    headers: HeaderMap,
    req: Request,
) -> AppResult<Response> {
    let (payload, avatar) = parse_register(req).await?;

    let name = payload.name.as_deref().map(str::trim).unwrap_or("").to_string();
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    let password = payload.password.as_deref().unwrap_or("");

    // Collect every failure before touching the store.
    let mut errors = FieldErrors::new();
    if name.is_empty() {
        errors.push("Name is required");
    } else if name.chars().count() < MIN_USER_NAME_LEN {
        errors.push(format!(
            "Name must be at least {MIN_USER_NAME_LEN} characters long"
        ));
    }

    if email.is_empty() {
        errors.push("Email is required");
    } else if !email_ok(&email) {
        errors.push("Email must be a valid address");
    } else if user::find_by_email(&state.pool, &email).await?.is_some() {
        errors.push("A user with that email already exists");
    }

    if password.is_empty() {
        errors.push("Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        ));
    } else if !password_complexity_ok(password) {
        errors.push(
            "Password must include upper and lower case letters, a digit and a special character",
        );
    }

    match payload.confirm_password.as_deref() {
        None | Some("") => errors.push("Password confirmation is required"),
        Some(confirm) if confirm != password => errors.push("Passwords do not match"),
        Some(_) => {}
    }

    if let Some(upload) = &avatar
        && !upload_ext_ok(&upload.original_name)
    {
        errors.push("Avatar must be JPG, JPEG, PNG or GIF");
    }

    errors.into_result()?;

    let avatar_path = match avatar {
        Some(upload) => Some(save_avatar(&state.config, upload).await?),
        None => None,
    };

    let password_hash = password::hash(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    // The unique index backstops a concurrent register with the same email.
    let created = user::create(
        &state.pool,
        user::NewUser {
            name,
            email,
            whatsapp: payload.whatsapp.unwrap_or_default(),
            avatar: avatar_path,
            password_hash,
            role: "user".into(),
        },
    )
    .await?;

    tracing::info!(user_id = created.id, email = %created.email, "User registered");

    let session_user = SessionUser {
        id: created.id,
        name: created.name,
        email: created.email,
        role: created.role,
    };
    Ok(auth_success(&state, &headers, session_user, false))
}

/// POST /users/login
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    req: Request,
) -> AppResult<Response> {
    let payload = parse_body::<UserLogin>(req).await?;

    let mut errors = FieldErrors::new();
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    if email.is_empty() {
        errors.push("Email is required");
    } else if !email_ok(&email) {
        errors.push("Email must be a valid address");
    }
    if payload.password.as_deref().unwrap_or("").is_empty() {
        errors.push("Password is required");
    }
    errors.into_result()?;

    let found = user::find_by_email(&state.pool, &email).await?;

    // Fixed delay before the outcome is revealed
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let valid = match &found {
        Some(u) => password::verify(&u.password_hash, payload.password.as_deref().unwrap_or(""))
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?,
        None => false,
    };

    let Some(found) = found.filter(|_| valid) else {
        tracing::warn!(email = %email, "Login failed - invalid credentials");
        return Err(AppError::InvalidCredentials);
    };

    let remember = matches!(&payload.remember, Some(flag) if RememberFlag::is_set(flag));

    tracing::info!(user_id = found.id, email = %found.email, "User logged in");

    let session_user = SessionUser {
        id: found.id,
        name: found.name,
        email: found.email,
        role: found.role,
    };
    Ok(auth_success(&state, &headers, session_user, remember))
}

/// GET /users/logout - destroy the session and clear the cookie
pub async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        state.sessions.remove(&id);
    }
    ([(header::SET_COOKIE, clear_cookie())], Redirect::to("/")).into_response()
}
