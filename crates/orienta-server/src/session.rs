//! In-memory session store keyed by a cookie.
//!
//! State is ephemeral per visit and not part of the durable data model; the
//! store is a shared map behind a `tokio::sync::Mutex`. The cookie carries
//! only an opaque UUID — all state stays server-side.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use tokio::sync::Mutex;
use uuid::Uuid;

use orienta_core::SessionState;

pub const SESSION_COOKIE: &str = "orienta_session";

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh session and return its id.
    pub async fn create(&self, state: SessionState) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().await.insert(id, state);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionState> {
        self.inner.lock().await.get(&id).cloned()
    }

    pub async fn put(&self, id: Uuid, state: SessionState) {
        self.inner.lock().await.insert(id, state);
    }
}

/// Extract the session id from the request's `Cookie` header, if present and
/// well-formed.
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a new session id.
#[must_use]
pub fn session_cookie_value(id: Uuid) -> HeaderValue {
    // The UUID is ASCII, so the header value is always valid.
    HeaderValue::from_str(&format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}
