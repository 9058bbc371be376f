pub mod command;

pub use command::{run_tool, run_tool_checked};

// debug! без форматирования аргументов, когда уровень DEBUG выключен
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}
