use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация о процессе в одном снимке списка процессов
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: u32,
}

impl ProcessInfo {
    pub fn new(name: impl Into<String>, pid: u32) -> Self {
        Self {
            name: name.into(),
            pid,
        }
    }

    /// Совпадает ли имя процесса с `name` без учёта регистра
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (pid {})", self.name, self.pid)
    }
}

/// Информация об окне верхнего уровня
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowInfo {
    pub title: String,
    pub pid: Option<u32>,
    pub visible: bool,
}

impl WindowInfo {
    pub fn new(title: String) -> Self {
        Self {
            title,
            pid: None,
            visible: true,
        }
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    #[allow(dead_code)]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Окно видно и у него есть заголовок
    pub fn is_titled_and_visible(&self) -> bool {
        self.visible && !self.title.is_empty()
    }
}

impl fmt::Display for WindowInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "\"{}\" (pid {})", self.title, pid),
            None => write!(f, "\"{}\"", self.title),
        }
    }
}
