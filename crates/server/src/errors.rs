use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// The single client-visible failure of the auth endpoints: 400 with no body.
///
/// Whatever went wrong is logged server-side before this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadRequest;

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        StatusCode::BAD_REQUEST.into_response()
    }
}
