use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

use crate::debug_if_enabled;

// Процессы, которые дают ложные совпадения с названиями игр (в нижнем регистре)
static BLACKLIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();

    set.insert("locationnotificationwindows.exe");
    set.insert("rzdiagnostic");
    set.insert("trustedinstaller.exe");
    set.insert("searchindexer.exe");
    set.insert("searchprotocolhost.exe");
    set.insert("monotificationux.exe");
    set.insert("enumwindows");
    set.insert("rvcontrolsvc.exe");

    set
});

/// Результат сопоставления процессов со списком игр
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMatch {
    /// Совпавшие имена процессов в нижнем регистре, без повторов
    pub matched: BTreeSet<String>,
}

impl GameMatch {
    pub fn any_match(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Имена через запятую, как они пишутся в журнал ложных срабатываний
    pub fn joined(&self) -> String {
        self.matched.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Сопоставляет имена запущенных процессов со списком игр
#[derive(Debug, Clone)]
pub struct GameMatcher {
    games_lower: Vec<String>,
}

impl GameMatcher {
    pub fn new<S: AsRef<str>>(games: &[S]) -> Self {
        Self {
            games_lower: games
                .iter()
                .map(|g| g.as_ref().trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    #[allow(dead_code)]
    pub fn game_count(&self) -> usize {
        self.games_lower.len()
    }

    pub fn is_blacklisted(process_lower: &str) -> bool {
        BLACKLIST.iter().any(|entry| process_lower.contains(entry))
    }

    pub fn matches<'a, I>(&self, process_names: I) -> GameMatch
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut result = GameMatch::default();

        if self.games_lower.is_empty() {
            return result;
        }

        for name in process_names {
            let process_lower = name.to_lowercase();

            if Self::is_blacklisted(&process_lower) {
                continue;
            }

            // Игра - подстрока или префикс имени процесса
            if let Some(game) = self.games_lower.iter().find(|game| {
                process_lower.contains(game.as_str()) || process_lower.starts_with(game.as_str())
            }) {
                debug_if_enabled!("Найден процесс: {} (сопоставлен с игрой: {})", process_lower, game);
                result.matched.insert(process_lower);
            }
        }

        result
    }
}
