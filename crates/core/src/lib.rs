//! Hemera Core - Shared observability types.
//!
//! This crate provides the common types used across all Hemera components:
//! - `api` - HTTP service hosting the health, monitoring, and demo endpoints
//! - client runtimes that collect web vitals and beacon them to the API
//!
//! # Architecture
//!
//! The core crate contains only types and pure decision logic - no I/O, no
//! HTTP clients, no async. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`environment`] - Deployment environment classifier
//! - [`types`] - Request identity, response envelope, error taxonomy, and
//!   web-vitals metric types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod environment;
pub mod types;

pub use environment::{Environment, EnvironmentError};
pub use types::*;
