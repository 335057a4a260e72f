//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, continue traces)
//! 2. `TraceLayer` (request tracing)
//! 3. Request context (mint canonical id, completion logging)
//! 4. Security headers (nosniff, frame denial, cache suppression)

pub mod request_context;
pub mod security_headers;

pub use request_context::{REQUEST_ID_HEADER, TRACE_ID_HEADER, request_context_middleware};
pub use security_headers::security_headers_middleware;
