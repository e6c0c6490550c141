//! HTTP API — router, error envelope, and endpoint handlers.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod types;
