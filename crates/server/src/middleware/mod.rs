//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction), added in `main`
//! 2. `TraceLayer` (`http_request` span with method, uri, status, latency)
//! 3. Request ID (records `request_id` on the span, echoes the header)
//! 4. Panic catcher (turns a handler panic into a 500 detail body)

pub mod panic;
pub mod request_id;

pub use panic::handle_panic;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
