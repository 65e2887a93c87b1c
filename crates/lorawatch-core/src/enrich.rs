//! Per-device enrichment seam.

use lorawatch_types::{Device, Message};

/// In-place device augmentation invoked with the device's latest message.
///
/// The transform is opaque to the aggregation engine: it may rewrite any
/// device field or deposit derived attributes into the device's extra map.
/// It is called once per device that produced a message, after the gateway
/// list and timestamp have been attached, and is skipped for devices whose
/// message list came back empty.
pub trait Enrich: Send + Sync {
    fn enrich(&self, device: &mut Device, message: &Message);
}

/// Enrichment that leaves devices untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnrichment;

impl Enrich for NoEnrichment {
    fn enrich(&self, _device: &mut Device, _message: &Message) {}
}

/// Adapter turning a plain closure into an [`Enrich`] implementation.
pub struct EnrichFn<F>(pub F);

impl<F> Enrich for EnrichFn<F>
where
    F: Fn(&mut Device, &Message) + Send + Sync,
{
    fn enrich(&self, device: &mut Device, message: &Message) {
        (self.0)(device, message)
    }
}
