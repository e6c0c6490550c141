//! User-identification middleware for user-scoped routes.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{validate_user_id, UserContext};

/// Header carrying the opaque per-user identifier.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Require a valid `X-User-Id` header and inject [`UserContext`].
///
/// The identifier is a client-minted namespace, not authentication.
pub async fn require_user(mut req: Request, next: Next) -> Response {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(validate_user_id);

    match user_id {
        Some(user_id) => {
            req.extensions_mut().insert(UserContext { user_id });
            next.run(req).await
        }
        None => ApiError::InvalidUser.into_response(),
    }
}
