use anyhow::{Context, Result};
use std::path::Path;

/// Список игр: один идентификатор на строку, пустые строки пропускаются.
/// Загружается один раз при старте.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameList {
    pub games: Vec<String>,
}

impl GameList {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Файл {} не найден. Создан новый файл.", path.display());
            if let Err(e) = std::fs::write(path, "") {
                tracing::warn!("Не удалось создать {}: {}", path.display(), e);
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Не удалось прочитать {}", path.display()))?;

        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        Self {
            games: content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
