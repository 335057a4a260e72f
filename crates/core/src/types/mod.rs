//! Core types for Hemera.
//!
//! This module provides the wire and domain types shared by the API service
//! and the telemetry client runtimes.

pub mod envelope;
pub mod error_code;
pub mod request;
pub mod vitals;

pub use envelope::{API_VERSION, ApiEnvelope, ErrorBody, ResponseMeta, UNKNOWN_REQUEST_ID};
pub use error_code::ErrorCode;
pub use request::{RequestContext, RequestId};
pub use vitals::{RawVitalPayload, VitalKind, WebVitalMetric};
