//! Telemetry sink boundary.
//!
//! The bus reports a diagnostic trace of every publish and every isolated
//! handler failure to a [`TelemetrySink`]. The host shell injects its own
//! sink at bus construction; [`TracingSink`] is the default and forwards
//! everything to `tracing`.

use crate::event_bus::{EventEnvelope, SubscriptionId};

/// Receiver for bus diagnostics.
pub trait TelemetrySink {
    /// Called once per publish, before handler dispatch begins.
    fn event_published(&self, envelope: &EventEnvelope);

    /// Called when a handler failed during dispatch.
    ///
    /// The failure has already been isolated; delivery to the remaining
    /// handlers continues and the publisher is never informed.
    fn handler_failed(&self, event_name: &str, subscription: SubscriptionId, message: &str);
}

/// Default sink forwarding diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn event_published(&self, envelope: &EventEnvelope) {
        tracing::debug!(
            event = envelope.name(),
            timestamp = %envelope.timestamp,
            "{}",
            envelope.event.description()
        );
    }

    fn handler_failed(&self, event_name: &str, subscription: SubscriptionId, message: &str) {
        tracing::error!(
            event = event_name,
            subscription = %subscription,
            "Event handler failed: {}",
            message
        );
    }
}
