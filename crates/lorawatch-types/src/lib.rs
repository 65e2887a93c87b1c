//! Wire and domain types for the lorawatch sensor aggregator.
//!
//! This crate defines the entities the telemetry platform returns
//! (projects, devices, and uplink messages) along with the response
//! envelope every endpoint wraps them in, and the assembled [`Snapshot`]
//! that is both the read result and the cached artifact.
//!
//! Upstream payloads carry many fields the aggregator does not model.
//! Every type here preserves them verbatim through a flattened map, so a
//! snapshot round-trips the platform's data unchanged.

pub mod envelope;
pub mod types;

pub use envelope::{Envelope, Meta};
pub use types::{Device, GatewayReception, Message, Project, Snapshot};
