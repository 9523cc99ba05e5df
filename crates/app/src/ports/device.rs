//! Device port: cover state and commands.

use std::future::Future;

use blindhub_domain::device::{DeviceState, DeviceUpdate};
use blindhub_domain::error::BlindHubError;
use blindhub_domain::id::DeviceRef;

/// Access to the covers the engine drives.
pub trait DeviceRegistry {
    /// Current state of `device`, `None` when the registry doesn't know it.
    fn state(
        &self,
        device: &DeviceRef,
    ) -> impl Future<Output = Result<Option<DeviceState>, BlindHubError>> + Send;

    /// Issue the update's command (if any) and store its `auto` flag.
    ///
    /// Both parts must land together: no other update to the same device may
    /// be observed between them.
    ///
    /// # Errors
    ///
    /// Returns [`BlindHubError::NotFound`] when `device` is unknown.
    fn apply(
        &self,
        device: &DeviceRef,
        update: DeviceUpdate,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send;
}

impl<T: DeviceRegistry + Send + Sync> DeviceRegistry for std::sync::Arc<T> {
    fn state(
        &self,
        device: &DeviceRef,
    ) -> impl Future<Output = Result<Option<DeviceState>, BlindHubError>> + Send {
        (**self).state(device)
    }

    fn apply(
        &self,
        device: &DeviceRef,
        update: DeviceUpdate,
    ) -> impl Future<Output = Result<(), BlindHubError>> + Send {
        (**self).apply(device, update)
    }
}
