use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::Volume;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub player: PlayerConfig,
    pub volume: VolumeConfig,
    pub monitor: MonitorConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Имя процесса плеера, как его показывает ОС (без учёта регистра)
    pub process_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub ducked: u16,
    pub normal: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_ms: u64,
    pub recovery_interval_ms: u64,
    pub games_file: PathBuf,
    pub false_positives_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub browser_processes: Vec<String>,
    pub site_keywords: Vec<String>,
    pub browser_title_markers: Vec<String>,
    pub title_separator: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            process_name: "spotify".to_string(),
        }
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            ducked: 50,
            normal: 70,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            recovery_interval_ms: 1000,
            games_file: PathBuf::from("games.txt"),
            false_positives_file: PathBuf::from("false_positives.txt"),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let browsers = [
            "chrome",
            "chromium",
            "google-chrome",
            "msedge",
            "microsoft-edge",
            "firefox",
            "firefox-bin",
        ];

        Self {
            browser_processes: browsers
                .iter()
                .flat_map(|b| [b.to_string(), format!("{}.exe", b)])
                .collect(),
            site_keywords: vec!["youtube".to_string(), "ютуб".to_string()],
            browser_title_markers: vec![
                "chrome".to_string(),
                "chromium".to_string(),
                "edge".to_string(),
                "firefox".to_string(),
            ],
            title_separator: " - ".to_string(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("DUCKER_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.player.process_name.trim().is_empty() {
            anyhow::bail!("player.process_name не может быть пустым");
        }

        Volume::try_from(self.volume.ducked).context("volume.ducked")?;
        Volume::try_from(self.volume.normal).context("volume.normal")?;

        if self.monitor.poll_interval_ms < 100 {
            anyhow::bail!("poll_interval_ms должно быть минимум 100");
        }

        if self.monitor.recovery_interval_ms == 0 {
            anyhow::bail!("recovery_interval_ms должно быть больше 0");
        }

        if self.playback.browser_processes.is_empty() {
            anyhow::bail!("Список browser_processes пуст");
        }

        if self.playback.site_keywords.is_empty() {
            anyhow::bail!("Список site_keywords пуст");
        }

        if self.playback.browser_title_markers.is_empty() {
            anyhow::bail!("Список browser_title_markers пуст");
        }

        if self.playback.title_separator.is_empty() {
            anyhow::bail!("title_separator не может быть пустым");
        }

        Ok(())
    }

    /// Громкость "тихого режима"; диапазон уже проверен в validate()
    pub fn ducked_volume(&self) -> Volume {
        Volume::clamped(self.volume.ducked)
    }

    pub fn normal_volume(&self) -> Volume {
        Volume::clamped(self.volume.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.poll_interval_ms, 500);
        assert_eq!(config.monitor.recovery_interval_ms, 1000);
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        let mut config = Config::default();
        config.volume.ducked = 150;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.player.process_name, "spotify");
        assert_eq!(config.volume.ducked, 50);
        assert_eq!(config.volume.normal, 70);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ducker.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[player]\nprocess_name = \"YandexMusic.exe\"\n\n[volume]\nducked = 20").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.player.process_name, "YandexMusic.exe");
        assert_eq!(config.volume.ducked, 20);
        assert_eq!(config.volume.normal, 70);
        assert_eq!(config.playback.site_keywords, vec!["youtube", "ютуб"]);
    }

    #[test]
    fn test_default_browsers_include_exe_forms() {
        let config = Config::default();
        let browsers = &config.playback.browser_processes;

        assert!(browsers.iter().any(|b| b == "chrome"));
        assert!(browsers.iter().any(|b| b == "chrome.exe"));
        assert!(browsers.iter().any(|b| b == "firefox.exe"));
    }
}
