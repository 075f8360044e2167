//! Liveness greeting

use axum::{routing::get, Router};

pub const GREETING: &str = "Welcome to Note App";

/// GET /
async fn root() -> &'static str {
    GREETING
}

/// Root routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}
