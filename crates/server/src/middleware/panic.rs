//! Panic handler for `CatchPanicLayer`.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Render a caught handler panic as a 500 with the standard error body.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    AppError::Internal(format!("handler panicked: {message}")).into_response()
}
