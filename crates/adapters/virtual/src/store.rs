//! Mode state repositories.
//!
//! [`JsonFileModeStore`] keeps every mode switch in one JSON object keyed by
//! mode name, rewritten through a temporary file so a crash never leaves a
//! half-written state behind.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use blindhub_app::ports::ModeStateRepository;
use blindhub_domain::error::BlindHubError;
use blindhub_domain::mode::{Mode, ModeSwitch};

use crate::error::VirtualError;

type Switches = BTreeMap<Mode, ModeSwitch>;

pub struct JsonFileModeStore {
    path: PathBuf,
    // serializes read-modify-write cycles
    lock: tokio::sync::Mutex<()>,
}

impl JsonFileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Switches, VirtualError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(VirtualError::Json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Switches::new()),
            Err(err) => Err(VirtualError::Io(err)),
        }
    }

    async fn write_all(&self, switches: &Switches) -> Result<(), VirtualError> {
        let bytes = serde_json::to_vec_pretty(switches).map_err(VirtualError::Json)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(VirtualError::Io)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(VirtualError::Io)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(VirtualError::Io)
    }
}

impl ModeStateRepository for JsonFileModeStore {
    async fn load(&self, mode: Mode) -> Result<Option<ModeSwitch>, BlindHubError> {
        let _guard = self.lock.lock().await;
        let mut switches = self.read_all().await?;
        Ok(switches.remove(&mode))
    }

    async fn save(&self, switch: &ModeSwitch) -> Result<(), BlindHubError> {
        let _guard = self.lock.lock().await;
        let mut switches = self.read_all().await?;
        switches.insert(switch.mode, switch.clone());
        self.write_all(&switches).await?;
        tracing::debug!(mode = %switch.mode, path = %self.path.display(), "mode state saved");
        Ok(())
    }
}

/// Mode switches kept in memory only, lost on restart.
#[derive(Default)]
pub struct InMemoryModeStore {
    switches: Mutex<HashMap<Mode, ModeSwitch>>,
}

impl ModeStateRepository for InMemoryModeStore {
    async fn load(&self, mode: Mode) -> Result<Option<ModeSwitch>, BlindHubError> {
        let switches = self.switches.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(switches.get(&mode).cloned())
    }

    async fn save(&self, switch: &ModeSwitch) -> Result<(), BlindHubError> {
        let mut switches = self.switches.lock().unwrap_or_else(PoisonError::into_inner);
        switches.insert(switch.mode, switch.clone());
        Ok(())
    }
}
