use crate::config::PlaybackConfig;
use crate::events::{ProcessInfo, WindowInfo};
use crate::services::system::{ProcessSource, WindowSource};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Правило "в окне браузера идёт видео" по заголовку.
///
/// Заголовок вкладки выглядит как `<страница> - <браузер>`: ключевое слово сайта
/// засчитывается только вместе с разделителем и названием браузера.
#[derive(Debug, Clone)]
pub struct PlaybackRules {
    browser_processes: HashSet<String>,
    site_keywords: Vec<String>,
    browser_title_markers: Vec<String>,
    title_separator: String,
}

impl PlaybackRules {
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let lower = |list: &[String]| -> Vec<String> {
            list.iter().map(|s| s.to_lowercase()).collect()
        };

        Self {
            browser_processes: config
                .browser_processes
                .iter()
                .map(|b| b.to_lowercase())
                .collect(),
            site_keywords: lower(config.site_keywords.as_slice()),
            browser_title_markers: lower(config.browser_title_markers.as_slice()),
            title_separator: config.title_separator.clone(),
        }
    }

    pub fn is_browser(&self, process: &ProcessInfo) -> bool {
        self.browser_processes.contains(&process.name.to_lowercase())
    }

    pub fn is_video_title(&self, title: &str) -> bool {
        let title_lower = title.to_lowercase();

        self.site_keywords.iter().any(|k| title_lower.contains(k.as_str()))
            && title.contains(self.title_separator.as_str())
            && self
                .browser_title_markers
                .iter()
                .any(|m| title_lower.contains(m.as_str()))
    }

    pub fn is_video_window(&self, window: &WindowInfo) -> bool {
        window.is_titled_and_visible() && self.is_video_title(&window.title)
    }
}

/// Определяет, смотрит ли пользователь видео в браузере
pub struct PlaybackDetector {
    rules: PlaybackRules,
    processes: Arc<dyn ProcessSource>,
    windows: Arc<dyn WindowSource>,
}

impl PlaybackDetector {
    pub fn new(
        config: &PlaybackConfig,
        processes: Arc<dyn ProcessSource>,
        windows: Arc<dyn WindowSource>,
    ) -> Self {
        Self {
            rules: PlaybackRules::from_config(config),
            processes,
            windows,
        }
    }

    #[allow(dead_code)]
    /// Сам запрашивает список процессов; при любой ошибке - false
    pub fn is_playback_active(&self) -> bool {
        match self.processes.list_processes() {
            Ok(processes) => self.is_playback_active_among(&processes),
            Err(e) => {
                debug!("Не удалось получить список процессов для поиска браузеров: {}", e);
                false
            }
        }
    }

    /// Проверяет окна браузеров из уже снятого снимка процессов
    pub fn is_playback_active_among(&self, processes: &[ProcessInfo]) -> bool {
        let browser_pids: Vec<u32> = processes
            .iter()
            .filter(|p| self.rules.is_browser(p))
            .map(|p| p.pid)
            .collect();

        browser_pids.into_iter().any(|pid| {
            match self.windows.windows_for_process(pid) {
                Ok(windows) => windows.iter().any(|w| {
                    let playing = self.rules.is_video_window(w);
                    if playing {
                        debug!("Видео в окне {}", w);
                    }
                    playing
                }),
                Err(e) => {
                    debug!("Ошибка при проверке PID {}: {}", pid, e);
                    false
                }
            }
        })
    }
}
