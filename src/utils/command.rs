use crate::error::{DuckerError, Result};
use std::collections::HashMap;
use std::process::{Command, Output};
use tracing::debug;

/// Переменные окружения сессии пользователя, если демон запущен через sudo.
///
/// pactl и xdotool без них обращаются к сессии root и ничего не находят.
fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert(
                        "PULSE_RUNTIME_PATH".to_string(),
                        format!("{}/pulse", user_runtime_dir),
                    );
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    if let Ok(display_var) = std::env::var("DISPLAY") {
        env_vars.insert("DISPLAY".to_string(), display_var);
    }

    env_vars
}

/// Собирает команду для внешней утилиты с окружением сессии пользователя
pub fn session_command(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);

    for (key, value) in build_env_overrides() {
        cmd.env(key, value);
    }

    cmd
}

/// Запускает утилиту и возвращает её вывод; отсутствие утилиты - ServiceUnavailable
pub fn run_tool(program: &str, args: &[&str]) -> Result<Output> {
    session_command(program, args).output().map_err(|e| {
        debug!("{} не найден или не работает: {}", program, e);
        DuckerError::ServiceUnavailable(format!("{} не найден: {}", program, e))
    })
}

/// Запускает утилиту и требует успешного кода возврата
pub fn run_tool_checked(program: &str, args: &[&str]) -> Result<String> {
    let output = run_tool(program, args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DuckerError::CommandFailed(format!(
            "{} {}: {}",
            program,
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
