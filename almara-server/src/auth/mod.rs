//! Authentication
//!
//! Session-cookie auth for the browser flows:
//!
//! - [`session`] - in-process session store and cookie helpers
//! - [`password`] - argon2 hashing and verification
//! - [`middleware`] - guest/auth gates for the HTML pages

pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::session_gate;
pub use session::{SESSION_COOKIE, SessionStore};
