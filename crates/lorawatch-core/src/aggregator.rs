//! Three-level fan-out aggregation over the telemetry platform.
//!
//! One run fetches the project list, fans out one device-list request per
//! project, fans out one latest-message request per device, and assembles
//! the flattened result. The total number of leaf requests is unknown until
//! every device batch has arrived, and responses complete in arbitrary
//! order; message fetches for an early batch overlap with device batches
//! still in flight.
//!
//! Completion is structural: the run drives two [`FuturesUnordered`] sets
//! (device batches and message leaves) from a single `select!` loop and ends
//! exactly when both are exhausted, which is precisely "every project-level
//! fan-out has resolved and every leaf request accumulated so far has
//! resolved". The run function returns once, so the result is delivered
//! exactly once regardless of arrival interleaving.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use lorawatch_types::{Device, Envelope, Message, Project, Snapshot};

use crate::config::ConnectionConfig;
use crate::enrich::Enrich;
use crate::error::AggregateError;
use crate::transport::Transport;

/// One-shot aggregation engine.
///
/// Holds the collaborators for a run; [`Aggregator::run`] performs one full
/// pass and assembles a [`Snapshot`]. Requests are never retried and the
/// fan-out is unbounded: every device and message fetch is issued as soon as
/// it is known.
pub struct Aggregator {
    config: Arc<ConnectionConfig>,
    transport: Arc<dyn Transport>,
    enricher: Arc<dyn Enrich>,
}

impl Aggregator {
    pub fn new(
        config: Arc<ConnectionConfig>,
        transport: Arc<dyn Transport>,
        enricher: Arc<dyn Enrich>,
    ) -> Self {
        Self {
            config,
            transport,
            enricher,
        }
    }

    /// Run one full aggregation pass.
    ///
    /// Only a root-level failure aborts the run. A failed or rejected
    /// device-list request drops that project's branch; a failed, rejected,
    /// or empty message fetch leaves its device unenriched. Either way the
    /// run completes with what the remaining branches produced.
    pub async fn run(&self) -> Result<Snapshot, AggregateError> {
        let root_url = self.config.project_url();
        let body = self.transport.get(&root_url).await.map_err(|e| {
            error!("Unable to get project data from the server: {e}");
            AggregateError::Root(e)
        })?;

        let projects = Envelope::<Project>::parse(&body)
            .map_err(AggregateError::RootParse)?
            .into_records()
            .ok_or_else(|| {
                error!("Project request yielded no records: {body}");
                AggregateError::Rejected
            })?;

        info!("Fetched {} project(s)", projects.len());

        let mut batches = FuturesUnordered::new();
        for project in &projects {
            let transport = Arc::clone(&self.transport);
            let url = self.config.device_url(project);
            let project_id = project.project_id.clone();
            batches.push(async move {
                let result = transport.get(&url).await;
                (project_id, result)
            });
        }

        let mut leaves = FuturesUnordered::new();
        let mut sensors: Vec<Device> = Vec::new();

        // Message fetches are pushed the moment their batch lands, so the two
        // sets drain concurrently; the loop ends only when both are empty.
        loop {
            tokio::select! {
                Some((project_id, result)) = batches.next() => {
                    match result {
                        Ok(body) => {
                            let devices =
                                leaf_records::<Device>(&body, "device").unwrap_or_default();
                            for device in devices {
                                let transport = Arc::clone(&self.transport);
                                let url = self.config.message_url(&device);
                                leaves.push(async move {
                                    let result = transport.get(&url).await;
                                    (device, result)
                                });
                            }
                        }
                        Err(e) => {
                            warn!("Device request for project {project_id} failed: {e}");
                        }
                    }
                }
                Some((mut device, result)) = leaves.next() => {
                    match result {
                        Ok(body) => self.attach_message(&mut device, &body),
                        Err(e) => {
                            warn!("Message request for device {} failed: {e}", device.dev_eui);
                        }
                    }
                    sensors.push(device);
                }
                else => break,
            }
        }

        info!(
            "Assembled {} sensor(s) across {} project(s)",
            sensors.len(),
            projects.len()
        );
        Ok(Snapshot { projects, sensors })
    }

    /// Attach the latest message to a device and run the enrichment transform.
    fn attach_message(&self, device: &mut Device, body: &str) {
        let messages = leaf_records::<Message>(body, "message").unwrap_or_default();
        match messages.into_iter().next() {
            Some(message) => {
                device.attach_latest(&message);
                self.enricher.enrich(device, &message);
            }
            None => warn!("No messages for device {}", device.dev_eui),
        }
    }
}

/// Parse a non-root response body, degrading every failure to "no records".
fn leaf_records<T: DeserializeOwned>(body: &str, what: &str) -> Option<Vec<T>> {
    match Envelope::<T>::parse(body) {
        Ok(envelope) => {
            if envelope.is_rejected() {
                warn!("{what} request rejected by the platform: {body}");
            }
            envelope.into_records()
        }
        Err(e) => {
            warn!("Unparseable {what} response: {e}");
            None
        }
    }
}
