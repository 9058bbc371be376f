use crate::error::Result;
use crate::services::game_matcher::GameMatch;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

// Формат C ctime(): "Sat Oct 18 14:03:07 2026"
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Журнал возможных ложных срабатываний (только дозапись).
///
/// Файл открывается и закрывается на каждую запись, дескриптор между тиками не держим.
#[derive(Debug, Clone)]
pub struct FalsePositiveLog {
    path: PathBuf,
}

impl FalsePositiveLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Дописывает одну строку, если совпадения есть
    pub fn record(&self, game_match: &GameMatch) -> Result<()> {
        if !game_match.any_match() {
            return Ok(());
        }

        warn!("Возможные ложные срабатывания: {}", game_match.joined());

        let line = format_record(&Local::now(), game_match);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        Ok(())
    }
}

pub fn format_record(timestamp: &DateTime<Local>, game_match: &GameMatch) -> String {
    format!("{}: {}", timestamp.format(CTIME_FORMAT), game_match.joined())
}
