use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use garaj_core::error::GarajError;

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<GarajError>() {
            Some(
                GarajError::InvalidAudienceSelector(_) | GarajError::EmptyMessage,
            ) => StatusCode::BAD_REQUEST,
            Some(
                GarajError::ConfigNotFound(_)
                | GarajError::Store(_)
                | GarajError::Io(_)
                | GarajError::Yaml(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
