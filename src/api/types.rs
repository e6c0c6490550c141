//! Shared types for the API layer.

use std::sync::Arc;

use crate::state::AppState;

/// Longest accepted opaque user identifier.
pub const MAX_USER_ID_LEN: usize = 128;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

/// Identified user context, injected into request extensions by the
/// user middleware on user-scoped routes.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
}

/// Validate a raw `X-User-Id` header value.
///
/// The identifier is opaque (the client mints it), but it must be non-empty,
/// bounded, and printable so it is safe to log and store.
pub fn validate_user_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_USER_ID_LEN {
        return None;
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return None;
    }
    Some(trimmed.to_string())
}
