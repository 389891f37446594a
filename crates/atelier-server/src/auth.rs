//! Password login and the session cookie that gates the admin pages.
//!
//! The cookie holds `<expiry>.<signature>`, where the signature is a hex
//! HMAC-SHA256 of the expiry timestamp keyed by the session secret.

use crate::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Session lifetime in seconds (8 hours).
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 8;

/// Prefix of the pages that require a session.
pub const ADMIN_PREFIX: &str = "/sculptures-admin";

pub const LOGIN_PATH: &str = "/login";

fn signature(secret: &str, expiry: i64) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(expiry.to_string().as_bytes());
    Some(mac)
}

/// Issue a token valid until `now + SESSION_TTL_SECS`.
pub fn issue_token(secret: &str, now: i64) -> Option<String> {
    let expiry = now + SESSION_TTL_SECS;
    let mac = signature(secret, expiry)?;
    Some(format!("{}.{}", expiry, hex::encode(mac.finalize().into_bytes())))
}

/// Check a token's signature and expiry.
pub fn verify_token(secret: &str, token: &str, now: i64) -> bool {
    let Some((expiry, sig)) = token.split_once('.') else {
        return false;
    };
    let Ok(expiry) = expiry.parse::<i64>() else {
        return false;
    };
    if expiry <= now {
        return false;
    }
    let Ok(sig) = hex::decode(sig) else {
        return false;
    };
    match signature(secret, expiry) {
        Some(mac) => mac.verify_slice(&sig).is_ok(),
        None => false,
    }
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(name: &str, token: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
        name, token, SESSION_TTL_SECS
    )
}

/// Find a cookie by name in the request headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Whether `path` is the admin prefix or lies below it.
pub fn is_admin_path(path: &str) -> bool {
    path.strip_prefix(ADMIN_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Login location that returns to `path` afterwards.
pub fn login_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?redirect={}", LOGIN_PATH, encoded)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `POST /api/login`
pub async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let password = body.get("password").and_then(Value::as_str);
    if password != Some(state.config.password.as_str()) {
        tracing::warn!("rejected login attempt");
        return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false }))).into_response();
    }

    let Some(token) = issue_token(&state.config.session_secret, now()) else {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false })))
            .into_response();
    };
    let cookie = session_cookie(&state.config.cookie_name, &token);
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Middleware guarding everything under [`ADMIN_PREFIX`]: pass with a valid
/// session, otherwise redirect to the login page. Other paths pass untouched.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !is_admin_path(request.uri().path()) {
        return next.run(request).await;
    }
    let authorized = cookie_value(request.headers(), &state.config.cookie_name)
        .is_some_and(|token| verify_token(&state.config.session_secret, token, now()));
    if authorized {
        return next.run(request).await;
    }
    tracing::debug!(path = request.uri().path(), "redirecting to login");
    Redirect::to(&login_redirect(request.uri().path())).into_response()
}
