//! Event bus port: publish host events to the engine.

use std::future::Future;

use blindhub_domain::error::BlindHubError;
use blindhub_domain::event::HostEvent;

/// Publishes host events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: HostEvent) -> impl Future<Output = Result<(), BlindHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: HostEvent) -> impl Future<Output = Result<(), BlindHubError>> + Send {
        (**self).publish(event)
    }
}
