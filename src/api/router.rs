//! API router.
//!
//! Returns a composable `Router`. Routes are nested under `/api/`.
//! User-scoped routes sit behind the `require_user` middleware; `/health`
//! and `/scan` are open (scanning persists nothing, so it needs no user).

use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderName, HeaderValue, InvalidHeaderValue};
use axum::http::Method;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware::{self, USER_ID_HEADER};
use crate::api::types::ApiContext;

/// Slack for multipart framing on top of the image size cap.
const UPLOAD_BODY_LIMIT: usize = endpoints::scan::MAX_IMAGE_BYTES + 64 * 1024;

/// Build the API router.
pub fn api_router(ctx: ApiContext) -> Router {
    let user_scoped = Router::new()
        .route(
            "/records",
            get(endpoints::records::list).post(endpoints::records::save),
        )
        .route("/records/:id", delete(endpoints::records::remove))
        .route("/analysis", get(endpoints::analysis::frequency))
        .route("/analysis/pdf", get(endpoints::analysis::export_pdf))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::require_user));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/scan", post(endpoints::scan::scan))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .with_state(ctx);

    Router::new().nest("/api", user_scoped.merge(open))
}

/// CORS for the browser client. With an origin the frontend is pinned;
/// with `None` any origin is allowed.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)]);

    Ok(match allowed_origin {
        Some(origin) => cors.allow_origin(HeaderValue::from_str(origin)?),
        None => cors.allow_origin(Any),
    })
}
