use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuckerError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Команда завершилась с ошибкой: {0}")]
    CommandFailed(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Громкость вне диапазона 0..=100: {0}")]
    InvalidVolume(u16),
}

pub type Result<T> = std::result::Result<T, DuckerError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ducker_error {
    (command_failed, $($arg:tt)*) => {
        $crate::error::DuckerError::CommandFailed(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::DuckerError::ServiceUnavailable(format!($($arg)*))
    };
}
