use crate::ducker_error;
use crate::error::{DuckerError, Result};
use crate::events::WindowInfo;
use crate::utils::{run_tool, run_tool_checked};
use parking_lot::RwLock;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::r#trait::WindowSource;

/// Пауза перед повторным поиском утилит, если ни одна не работает
const REDETECT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkingMethod {
    Xdotool,
    Wmctrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detection {
    Unknown,
    Found(WorkingMethod),
    Unavailable { retry_at: Instant },
}

/// Окна процесса через внешние утилиты X11 (xdotool, затем wmctrl)
pub struct CommandWindowSource {
    detection: RwLock<Detection>,
    detect: fn() -> Result<WorkingMethod>,
    redetect_interval: Duration,
}

impl CommandWindowSource {
    pub fn new() -> Self {
        Self::with_detector(Self::detect_working_method, REDETECT_INTERVAL)
    }

    fn with_detector(detect: fn() -> Result<WorkingMethod>, redetect_interval: Duration) -> Self {
        Self {
            detection: RwLock::new(Detection::Unknown),
            detect,
            redetect_interval,
        }
    }

    fn detect_working_method() -> Result<WorkingMethod> {
        info!("Определяем рабочий метод перечисления окон...");

        if run_tool_checked("xdotool", &["version"]).is_ok() {
            info!("Используем xdotool");
            return Ok(WorkingMethod::Xdotool);
        }

        if run_tool_checked("wmctrl", &["-m"]).is_ok() {
            info!("Используем wmctrl");
            return Ok(WorkingMethod::Wmctrl);
        }

        Err(ducker_error!(service_unavailable, "Ни xdotool, ни wmctrl не работают"))
    }

    fn method(&self) -> Result<WorkingMethod> {
        let previous = *self.detection.read();
        match previous {
            Detection::Found(method) => return Ok(method),
            Detection::Unavailable { retry_at } if Instant::now() < retry_at => {
                return Err(ducker_error!(
                    service_unavailable,
                    "нет рабочего метода перечисления окон"
                ));
            }
            _ => {}
        }

        let mut detection = self.detection.write();
        // Другой поток мог успеть определить метод
        if let Detection::Found(method) = *detection {
            return Ok(method);
        }

        match (self.detect)() {
            Ok(method) => {
                *detection = Detection::Found(method);
                Ok(method)
            }
            Err(e) => {
                if matches!(previous, Detection::Unavailable { .. }) {
                    debug!("Окна по-прежнему недоступны: {}", e);
                } else {
                    warn!(
                        "{}. Заголовки окон недоступны, повторная проверка через {}s",
                        e,
                        self.redetect_interval.as_secs()
                    );
                }
                *detection = Detection::Unavailable {
                    retry_at: Instant::now() + self.redetect_interval,
                };
                Err(e)
            }
        }
    }

    fn xdotool_windows(pid: u32) -> Result<Vec<WindowInfo>> {
        let pid_arg = pid.to_string();
        let output = run_tool(
            "xdotool",
            &["search", "--onlyvisible", "--pid", &pid_arg, "--name", ""],
        )?;

        // Код 1 без stderr означает "окон нет"
        if !output.status.success() && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ducker_error!(command_failed, "xdotool search --pid {}: {}", pid, stderr.trim()));
        }

        let ids = String::from_utf8_lossy(&output.stdout).into_owned();
        let mut windows = Vec::new();

        for window_id in ids.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match run_tool_checked("xdotool", &["getwindowname", window_id]) {
                Ok(title) => {
                    windows.push(WindowInfo::new(title.trim().to_string()).with_pid(pid));
                }
                Err(e) => debug!("Не удалось получить заголовок окна {}: {}", window_id, e),
            }
        }

        Ok(windows)
    }

    fn wmctrl_windows(pid: u32) -> Result<Vec<WindowInfo>> {
        let stdout = run_tool_checked("wmctrl", &["-lp"])?;
        Ok(parse_wmctrl_listing(&stdout, pid))
    }
}

impl Default for CommandWindowSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSource for CommandWindowSource {
    fn windows_for_process(&self, pid: u32) -> Result<Vec<WindowInfo>> {
        let method = self.method()?;

        let result = match method {
            WorkingMethod::Xdotool => Self::xdotool_windows(pid),
            WorkingMethod::Wmctrl => Self::wmctrl_windows(pid),
        };

        if let Err(DuckerError::ServiceUnavailable(ref e)) = result {
            warn!("Рабочий метод {:?} перестал работать: {}. Переопределим на следующем запросе", method, e);
            *self.detection.write() = Detection::Unknown;
        }

        result
    }
}

/// Разбирает вывод `wmctrl -lp`: `<id> <desktop> <pid> <host> <title...>`
fn parse_wmctrl_listing(stdout: &str, pid: u32) -> Vec<WindowInfo> {
    stdout
        .lines()
        .filter_map(|line| {
            let (_id, rest) = next_field(line)?;
            let (_desktop, rest) = next_field(rest)?;
            let (window_pid, rest) = next_field(rest)?;
            let (_host, title) = next_field(rest)?;

            let window_pid: u32 = window_pid.parse().ok()?;
            if window_pid != pid {
                return None;
            }

            // Заголовок - остаток строки как есть, внутренние пробелы сохраняются
            Some(WindowInfo::new(title.trim_start().to_string()).with_pid(window_pid))
        })
        .collect()
}

fn next_field(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();
    if line.is_empty() {
        return None;
    }
    let end = line.find(char::is_whitespace).unwrap_or(line.len());
    Some(line.split_at(end))
}
