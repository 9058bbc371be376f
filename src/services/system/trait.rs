use crate::error::Result;
use crate::events::{ProcessInfo, WindowInfo};
use crate::services::Volume;
use std::sync::Arc;

/// Источник списка запущенных процессов
pub trait ProcessSource: Send + Sync {
    /// Снимок процессов на текущий момент
    fn list_processes(&self) -> Result<Vec<ProcessInfo>>;
}

/// Источник окон верхнего уровня для процесса
pub trait WindowSource: Send + Sync {
    /// Готовый конечный список окон процесса `pid`
    fn windows_for_process(&self, pid: u32) -> Result<Vec<WindowInfo>>;
}

/// Микшер аудиосессий
pub trait AudioMixer: Send + Sync {
    /// Ставит громкость первой сессии процесса `process_name`.
    /// `Ok(false)` - сессия не найдена.
    fn set_session_volume(&self, process_name: &str, volume: Volume) -> Result<bool>;
}

/// Набор системных бэкендов, которые опрашивает монитор
#[derive(Clone)]
pub struct SystemBackends {
    pub processes: Arc<dyn ProcessSource>,
    pub windows: Arc<dyn WindowSource>,
    pub mixer: Arc<dyn AudioMixer>,
}

/// Factory function to create the system backends based on the dry_run flag
pub fn create_system_backends(dry_run: bool) -> Result<SystemBackends> {
    let mixer: Arc<dyn AudioMixer> = if dry_run {
        Arc::new(super::dry_run::DryRunMixer::new())
    } else {
        Arc::new(super::pactl::PactlMixer::new())
    };

    Ok(SystemBackends {
        processes: Arc::new(super::processes::SysinfoProcessSource::new()),
        windows: Arc::new(super::windows::CommandWindowSource::new()),
        mixer,
    })
}
