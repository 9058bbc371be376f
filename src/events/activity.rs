use serde::{Deserialize, Serialize};
use std::fmt;

/// Снимок трёх сигналов за один тик.
///
/// Два состояния равны, только если совпадают все три поля. Монитор хранит
/// последнее применённое состояние и действует лишь при его смене.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActivityState {
    pub player_running: bool,
    pub playback_active: bool,
    pub game_active: bool,
}

/// Решение о громкости, вытекающее из [`ActivityState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeDecision {
    /// Плеер не запущен, громкость не трогаем
    NoAction,
    /// Видео или игра: приглушаем плеер
    Duck,
    /// Ничего не мешает: возвращаем обычную громкость
    Restore,
}

impl ActivityState {
    pub fn new(player_running: bool, playback_active: bool, game_active: bool) -> Self {
        Self {
            player_running,
            playback_active,
            game_active,
        }
    }

    pub fn decision(&self) -> VolumeDecision {
        if !self.player_running {
            VolumeDecision::NoAction
        } else if self.playback_active || self.game_active {
            VolumeDecision::Duck
        } else {
            VolumeDecision::Restore
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "плеер: {} | видео: {} | игра: {}",
            self.player_running, self.playback_active, self.game_active
        )
    }
}

impl fmt::Display for VolumeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAction => write!(f, "no-action"),
            Self::Duck => write!(f, "duck"),
            Self::Restore => write!(f, "restore"),
        }
    }
}
