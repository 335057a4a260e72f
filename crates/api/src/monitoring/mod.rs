//! Structured logging and external error reporting.
//!
//! [`RequestLogger`] is the per-request entry point; it mirrors every line to
//! the local `tracing` subscriber and hands a copy to the [`Reporter`], which
//! queues events toward an [`EventSink`] without ever blocking the request.

pub mod logger;
pub mod reporter;

pub use logger::RequestLogger;
pub use reporter::{
    EventSink, MemorySink, ReportContext, ReportEvent, ReportLevel, Reporter, ReporterOptions,
    SentrySink,
};
