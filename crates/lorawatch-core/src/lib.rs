//! Aggregation engine and platform client for the lorawatch sensor reader.
//!
//! This crate assembles the full sensor picture from a LoRaWAN telemetry
//! platform: the project list, every project's devices, and each device's
//! latest uplink message, enriched per device and flattened into one
//! [`lorawatch_types::Snapshot`].
//!
//! The fetch tree is dynamically sized (how many leaf requests a run issues
//! is only known once the first two levels have resolved) and every level
//! runs concurrently with unbounded fan-out. [`aggregator`] owns that
//! fan-out/fan-in; [`reader`] composes it with the snapshot cache from
//! `lorawatch-store`.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lorawatch_core::{ConnectionConfig, HttpTransport, NoEnrichment, SensorReader};
//! use lorawatch_store::SnapshotCache;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(ConnectionConfig::load_default()?);
//!     config.log_summary();
//!
//!     let cache = Arc::new(SnapshotCache::new(
//!         lorawatch_store::default_cache_path(),
//!         config.cache_ttl(),
//!     ));
//!     let transport = Arc::new(HttpTransport::from_config(&config)?);
//!     let reader = SensorReader::new(config, cache, transport, Arc::new(NoEnrichment));
//!
//!     let snapshot = reader.read_sensors_data(false).await?;
//!     println!("{} sensors", snapshot.sensors.len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod enrich;
pub mod error;
pub mod mock;
pub mod reader;
pub mod transport;

pub use aggregator::Aggregator;
pub use config::{ConfigError, ConnectionConfig, default_config_path};
pub use enrich::{Enrich, EnrichFn, NoEnrichment};
pub use error::{AggregateError, ReadError};
pub use reader::SensorReader;
pub use transport::{HttpTransport, Transport, TransportError};
