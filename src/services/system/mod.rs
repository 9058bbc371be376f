//! System backends: responsibility and boundaries
//!
//! This module and its submodules ONLY query the OS (process table, top-level
//! windows, audio sessions) and apply a volume level when asked. They MUST NOT
//! decide anything about games, video playback or when to duck; those decisions
//! belong to GameMatcher, PlaybackDetector and ActivityMonitor.

mod dry_run;
mod pactl;
mod processes;
mod windows;
mod r#trait;

pub use self::r#trait::{create_system_backends, AudioMixer, ProcessSource, SystemBackends, WindowSource};

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory backends for unit tests

    use super::{AudioMixer, ProcessSource, SystemBackends, WindowSource};
    use crate::error::{DuckerError, Result};
    use crate::events::{ProcessInfo, WindowInfo};
    use crate::services::Volume;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    pub struct FakeProcesses {
        pub processes: Mutex<Vec<ProcessInfo>>,
        pub fail: Mutex<bool>,
    }

    impl FakeProcesses {
        pub fn set(&self, names: &[(&str, u32)]) {
            *self.processes.lock() = names
                .iter()
                .map(|(name, pid)| ProcessInfo::new(*name, *pid))
                .collect();
        }
    }

    impl ProcessSource for FakeProcesses {
        fn list_processes(&self) -> Result<Vec<ProcessInfo>> {
            if *self.fail.lock() {
                return Err(DuckerError::ServiceUnavailable("fake processes".to_string()));
            }
            Ok(self.processes.lock().clone())
        }
    }

    #[derive(Default)]
    pub struct FakeWindows {
        pub windows: Mutex<HashMap<u32, Vec<WindowInfo>>>,
        pub failing_pids: Mutex<Vec<u32>>,
    }

    impl FakeWindows {
        pub fn set(&self, pid: u32, titles: &[&str]) {
            self.windows.lock().insert(
                pid,
                titles
                    .iter()
                    .map(|t| WindowInfo::new(t.to_string()).with_pid(pid))
                    .collect(),
            );
        }
    }

    impl WindowSource for FakeWindows {
        fn windows_for_process(&self, pid: u32) -> Result<Vec<WindowInfo>> {
            if self.failing_pids.lock().contains(&pid) {
                return Err(DuckerError::CommandFailed(format!("fake windows {}", pid)));
            }
            Ok(self.windows.lock().get(&pid).cloned().unwrap_or_default())
        }
    }

    pub struct FakeMixer {
        pub calls: Mutex<Vec<(String, Volume)>>,
        pub session_present: Mutex<bool>,
        pub fail: Mutex<bool>,
    }

    impl Default for FakeMixer {
        fn default() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                session_present: Mutex::new(true),
                fail: Mutex::new(false),
            }
        }
    }

    impl FakeMixer {
        pub fn volumes(&self) -> Vec<u8> {
            self.calls.lock().iter().map(|(_, v)| v.percent()).collect()
        }
    }

    impl AudioMixer for FakeMixer {
        fn set_session_volume(&self, process_name: &str, volume: Volume) -> Result<bool> {
            if *self.fail.lock() {
                return Err(DuckerError::ServiceUnavailable("fake mixer".to_string()));
            }
            self.calls.lock().push((process_name.to_string(), volume));
            Ok(*self.session_present.lock())
        }
    }

    pub struct Fakes {
        pub processes: Arc<FakeProcesses>,
        pub windows: Arc<FakeWindows>,
        pub mixer: Arc<FakeMixer>,
    }

    impl Fakes {
        pub fn new() -> Self {
            Self {
                processes: Arc::new(FakeProcesses::default()),
                windows: Arc::new(FakeWindows::default()),
                mixer: Arc::new(FakeMixer::default()),
            }
        }

        pub fn backends(&self) -> SystemBackends {
            SystemBackends {
                processes: self.processes.clone(),
                windows: self.windows.clone(),
                mixer: self.mixer.clone(),
            }
        }
    }
}
