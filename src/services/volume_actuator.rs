use crate::error::{DuckerError, Result};
use crate::services::system::AudioMixer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Громкость в процентах, всегда в диапазоне 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u16 = 100;

    pub fn percent(&self) -> u8 {
        self.0
    }

    /// Обрезает значение до 100
    pub fn clamped(value: u16) -> Self {
        Self(value.min(Self::MAX) as u8)
    }
}

impl TryFrom<u16> for Volume {
    type Error = DuckerError;

    fn try_from(value: u16) -> Result<Self> {
        if value > Self::MAX {
            return Err(DuckerError::InvalidVolume(value));
        }
        Ok(Self(value as u8))
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Применяет выбранный уровень громкости к аудиосессии плеера
pub struct VolumeActuator {
    mixer: Arc<dyn AudioMixer>,
}

impl VolumeActuator {
    pub fn new(mixer: Arc<dyn AudioMixer>) -> Self {
        Self { mixer }
    }

    /// `Ok(false)` - сессия плеера не найдена (не ошибка: плеер может ещё молчать)
    pub fn apply_volume(&self, target_process: &str, level: Volume) -> Result<bool> {
        let found = self.mixer.set_session_volume(target_process, level)?;

        if found {
            debug!("Установлена громкость {} для {}", level, target_process);
        } else {
            warn!("Аудиосессия процесса {} не найдена", target_process);
        }

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::system::fakes::FakeMixer;

    #[test]
    fn volume_range_is_validated() {
        assert_eq!(Volume::try_from(0u16).unwrap().percent(), 0);
        assert_eq!(Volume::try_from(100u16).unwrap().percent(), 100);
        assert!(matches!(Volume::try_from(101u16), Err(DuckerError::InvalidVolume(101))));
        assert_eq!(Volume::clamped(250).percent(), 100);
    }

    #[test]
    fn apply_volume_reports_found_session() {
        let mixer = Arc::new(FakeMixer::default());
        let actuator = VolumeActuator::new(mixer.clone());

        let found = actuator.apply_volume("spotify", Volume::clamped(40)).unwrap();

        assert!(found);
        assert_eq!(mixer.volumes(), vec![40]);
    }

    #[test]
    fn missing_session_is_not_an_error() {
        let mixer = Arc::new(FakeMixer::default());
        *mixer.session_present.lock() = false;
        let actuator = VolumeActuator::new(mixer);

        assert!(!actuator.apply_volume("spotify", Volume::clamped(40)).unwrap());
    }

    #[test]
    fn mixer_failure_propagates() {
        let mixer = Arc::new(FakeMixer::default());
        *mixer.fail.lock() = true;
        let actuator = VolumeActuator::new(mixer);

        assert!(actuator.apply_volume("spotify", Volume::clamped(40)).is_err());
    }
}
