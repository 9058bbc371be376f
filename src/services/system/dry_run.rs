use crate::error::Result;
use crate::services::Volume;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::AudioMixer;

/// Микшер для сухого запуска: только пишет в лог, громкость не меняет
pub struct DryRunMixer {
    last_volume: Mutex<Option<(String, Volume)>>,
}

impl DryRunMixer {
    pub fn new() -> Self {
        info!("Dry-run режим - громкость плеера меняться не будет");
        Self {
            last_volume: Mutex::new(None),
        }
    }

    #[allow(dead_code)]
    pub fn last_volume(&self) -> Option<(String, Volume)> {
        self.last_volume.lock().clone()
    }
}

impl Default for DryRunMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioMixer for DryRunMixer {
    fn set_session_volume(&self, process_name: &str, volume: Volume) -> Result<bool> {
        info!("[DRY RUN] Громкость {} для {}", volume, process_name);
        *self.last_volume.lock() = Some((process_name.to_string(), volume));
        Ok(true)
    }
}
