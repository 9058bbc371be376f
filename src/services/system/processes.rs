use crate::error::Result;
use crate::events::ProcessInfo;
use parking_lot::Mutex;
use std::ffi::OsStr;
use std::path::Path;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

use super::r#trait::ProcessSource;

/// Длина `comm` в ядре Linux без завершающего нуля
const COMM_MAX_LEN: usize = 15;

/// Список процессов через sysinfo.
///
/// `System` живёт между вызовами, каждый вызов обновляет только таблицу процессов.
/// Путь к исполняемому файлу читается один раз на процесс.
pub struct SysinfoProcessSource {
    system: Mutex<System>,
}

impl SysinfoProcessSource {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProcessSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSource for SysinfoProcessSource {
    fn list_processes(&self) -> Result<Vec<ProcessInfo>> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );

        let processes: Vec<ProcessInfo> = system
            .processes()
            .iter()
            .map(|(pid, process)| {
                ProcessInfo::new(full_process_name(process.name(), process.exe()), pid.as_u32())
            })
            .collect();

        debug!("sysinfo вернул {} процессов", processes.len());
        Ok(processes)
    }
}

/// Имя процесса без обрезки `comm`.
///
/// Имя файла из `exe` берётся, только если `comm` обрезан и является его началом:
/// у интерпретаторов и wine `exe` указывает на чужой бинарник.
/// Сравнение по байтам, обрезка может разрезать многобайтовый символ.
fn full_process_name(comm: &OsStr, exe: Option<&Path>) -> String {
    let comm_bytes = comm.as_encoded_bytes();

    if comm_bytes.len() >= COMM_MAX_LEN {
        if let Some(file) = exe.and_then(Path::file_name) {
            let file_bytes = file.as_encoded_bytes();
            if file_bytes.len() > comm_bytes.len() && file_bytes.starts_with(comm_bytes) {
                return file.to_string_lossy().into_owned();
            }
        }
    }

    comm.to_string_lossy().into_owned()
}
