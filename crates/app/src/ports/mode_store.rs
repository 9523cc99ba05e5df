//! Mode state port: persisted switch state survives restarts.

use std::future::Future;

use blindhub_domain::error::BlindHubError;
use blindhub_domain::mode::{Mode, ModeSwitch};

pub trait ModeStateRepository {
    /// Last saved switch for `mode`, `None` on first start.
    fn load(
        &self,
        mode: Mode,
    ) -> impl Future<Output = Result<Option<ModeSwitch>, BlindHubError>> + Send;

    fn save(&self, switch: &ModeSwitch) -> impl Future<Output = Result<(), BlindHubError>> + Send;
}

impl<T: ModeStateRepository + Send + Sync> ModeStateRepository for std::sync::Arc<T> {
    fn load(
        &self,
        mode: Mode,
    ) -> impl Future<Output = Result<Option<ModeSwitch>, BlindHubError>> + Send {
        (**self).load(mode)
    }

    fn save(&self, switch: &ModeSwitch) -> impl Future<Output = Result<(), BlindHubError>> + Send {
        (**self).save(switch)
    }
}
