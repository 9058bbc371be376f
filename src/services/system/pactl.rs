use crate::ducker_error;
use crate::error::Result;
use crate::services::Volume;
use crate::utils::command::session_command;
use tracing::debug;

use super::r#trait::AudioMixer;

/// Аудиосессия (sink input) PulseAudio / PipeWire-pulse
#[derive(Debug, Clone, PartialEq, Eq)]
struct SinkInput {
    index: u32,
    binary: Option<String>,
    app_name: Option<String>,
}

impl SinkInput {
    fn belongs_to(&self, process_name: &str) -> bool {
        let wanted = process_name.to_lowercase();
        [&self.binary, &self.app_name]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase() == wanted)
    }
}

/// Микшер через утилиту pactl
pub struct PactlMixer;

impl PactlMixer {
    pub fn new() -> Self {
        Self
    }

    fn pactl(args: &[&str]) -> Result<String> {
        // Вывод pactl локализован, разбираем только английский
        let output = session_command("pactl", args)
            .env("LC_ALL", "C")
            .output()
            .map_err(|e| ducker_error!(service_unavailable, "pactl не найден: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ducker_error!(command_failed, "pactl {}: {}", args.join(" "), stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PactlMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioMixer for PactlMixer {
    fn set_session_volume(&self, process_name: &str, volume: Volume) -> Result<bool> {
        let listing = Self::pactl(&["list", "sink-inputs"])?;
        let sessions = parse_sink_inputs(&listing);
        debug!("pactl: найдено {} аудиосессий", sessions.len());

        let Some(session) = sessions.iter().find(|s| s.belongs_to(process_name)) else {
            return Ok(false);
        };

        let index = session.index.to_string();
        let level = format!("{}%", volume.percent());
        Self::pactl(&["set-sink-input-volume", &index, &level])?;

        debug!("pactl: sink input #{} ({}) -> {}", session.index, process_name, level);
        Ok(true)
    }
}

/// Разбирает вывод `pactl list sink-inputs`
fn parse_sink_inputs(listing: &str) -> Vec<SinkInput> {
    let mut sessions = Vec::new();
    let mut current: Option<SinkInput> = None;

    for line in listing.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("Sink Input #") {
            if let Some(done) = current.take() {
                sessions.push(done);
            }
            current = rest.trim().parse().ok().map(|index| SinkInput {
                index,
                binary: None,
                app_name: None,
            });
            continue;
        }

        let Some(session) = current.as_mut() else {
            continue;
        };

        if let Some((key, value)) = trimmed.split_once(" = ") {
            let value = value.trim().trim_matches('"').to_string();
            match key.trim() {
                "application.process.binary" => session.binary = Some(value),
                "application.name" => session.app_name = Some(value),
                _ => {}
            }
        }
    }

    if let Some(done) = current {
        sessions.push(done);
    }

    sessions
}
