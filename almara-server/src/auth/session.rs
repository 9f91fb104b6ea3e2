//! Server-side session store
//!
//! Sessions live in process memory keyed by an unguessable id — the cookie
//! carries only the id. This matches the single-instance deployment model;
//! a restart logs everyone out.

use dashmap::DashMap;
use http::HeaderMap;
use shared::models::SessionUser;
use shared::util::now_millis;
use uuid::Uuid;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "almara_sid";

/// Remember-me cookie/session lifetime: 30 days.
pub const REMEMBER_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Server-side lifetime of a plain browser session. The cookie itself dies
/// with the browser; this bounds abandoned entries.
const DEFAULT_TTL_SECS: i64 = 60 * 60 * 24;

#[derive(Debug)]
struct SessionEntry {
    user: SessionUser,
    expires_at: i64,
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for `user`, returning the new session id.
    pub fn insert(&self, user: SessionUser, remember: bool) -> String {
        let id = Uuid::new_v4().to_string();
        let ttl_secs = if remember {
            REMEMBER_MAX_AGE_SECS
        } else {
            DEFAULT_TTL_SECS
        };
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                user,
                expires_at: now_millis() + ttl_secs * 1000,
            },
        );
        id
    }

    /// Look up a session, evicting it lazily when expired.
    pub fn get(&self, id: &str) -> Option<SessionUser> {
        let expired = match self.sessions.get(id) {
            Some(entry) if entry.expires_at > now_millis() => return Some(entry.user.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(id);
        }
        None
    }

    /// Destroy a session (logout).
    pub fn remove(&self, id: &str) {
        self.sessions.remove(id);
    }
}

// ── Cookie helpers ──────────────────────────────────────────────────

/// `Set-Cookie` value for a fresh session. With `remember` the cookie gets a
/// 30-day Max-Age, otherwise it expires with the browser session.
pub fn session_cookie(id: &str, remember: bool) -> String {
    let base = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if remember {
        format!("{base}; Max-Age={REMEMBER_MAX_AGE_SECS}")
    } else {
        base
    }
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session id from a request's Cookie header.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|kv| {
        let (name, value) = kv.split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}
