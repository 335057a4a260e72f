//! Performance telemetry: the collection gate, web-vitals wiring, and the
//! beacon that ships metrics to the ingestion endpoint.

pub mod beacon;
pub mod gate;
pub mod vitals;

pub use beacon::VitalsBeacon;
pub use gate::TelemetryGate;
pub use vitals::{VitalsSource, init_web_vitals};
