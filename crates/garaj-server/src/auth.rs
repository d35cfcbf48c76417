use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Shared-token gate for the admin API.
///
/// When `token` is `None` the middleware is a transparent no-op. Token
/// issuance lives with the dashboard login flow, not here.
#[derive(Clone, Default)]
pub struct AdminGate {
    pub token: Option<Arc<str>>,
}

impl AdminGate {
    /// No token configured, so all requests pass.
    pub fn open() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(Arc::from(token.into())),
        }
    }
}

/// Axum middleware that requires `Authorization: Bearer <token>` on `/api/*`.
///
/// Evaluated in order:
/// 1. no token configured → passthrough
/// 2. path outside `/api/` (`/`, `/health`) → passthrough
/// 3. bearer matches → passthrough
/// 4. otherwise → 401 JSON
pub async fn admin_middleware(State(gate): State<AdminGate>, req: Request, next: Next) -> Response {
    let Some(token) = gate.token.as_deref() else {
        return next.run(req).await;
    };

    if !req.uri().path().starts_with("/api/") {
        return next.run(req).await;
    }

    let presented = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);
    if presented == Some(token) {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "rejected admin request without valid token");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "unauthorized" })),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
