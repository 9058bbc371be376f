use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{ActivityState, ProcessInfo, VolumeDecision};
use crate::game_list::GameList;
use crate::services::diagnostics::FalsePositiveLog;
use crate::services::system::{ProcessSource, SystemBackends};
use crate::services::{GameMatcher, PlaybackDetector, VolumeActuator};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use super::r#trait::MonitorTrait;

pub struct ActivityMonitor {
    config: Arc<Config>,
    processes: Arc<dyn ProcessSource>,
    matcher: GameMatcher,
    playback: PlaybackDetector,
    actuator: VolumeActuator,
    diagnostics: FalsePositiveLog,
    // None до первого тика: первое состояние всегда применяется
    last_applied: Option<ActivityState>,
    tick_count: u64,
}

impl ActivityMonitor {
    pub fn new(config: Arc<Config>, games: &GameList, backends: SystemBackends) -> Self {
        info!(
            "Инициализация ActivityMonitor: плеер={}, тихо={}, нормально={}, игр={}",
            config.player.process_name,
            config.ducked_volume(),
            config.normal_volume(),
            games.len()
        );

        let playback = PlaybackDetector::new(
            &config.playback,
            backends.processes.clone(),
            backends.windows.clone(),
        );

        Self {
            matcher: GameMatcher::new(games.games.as_slice()),
            playback,
            actuator: VolumeActuator::new(backends.mixer),
            diagnostics: FalsePositiveLog::new(config.monitor.false_positives_file.clone()),
            processes: backends.processes,
            config,
            last_applied: None,
            tick_count: 0,
        }
    }

    pub fn last_applied(&self) -> Option<ActivityState> {
        self.last_applied
    }

    /// Снимает текущее состояние; недоступные данные считаются как false
    pub fn observe(&self) -> ActivityState {
        let processes: Vec<ProcessInfo> = match self.processes.list_processes() {
            Ok(processes) => processes,
            Err(e) => {
                warn!("Не удалось получить список процессов: {}", e);
                Vec::new()
            }
        };

        let player = &self.config.player.process_name;
        let player_running = processes.iter().any(|p| p.is_named(player));
        let playback_active = self.playback.is_playback_active_among(&processes);

        let game_match = self.matcher.matches(processes.iter().map(|p| p.name.as_str()));
        if let Err(e) = self.diagnostics.record(&game_match) {
            warn!(
                "Не удалось записать в {}: {}",
                self.diagnostics.path().display(),
                e
            );
        }

        ActivityState::new(player_running, playback_active, game_match.any_match())
    }

    /// Один тик. `Ok(None)` - состояние не изменилось, ничего не делали.
    pub fn tick(&mut self) -> Result<Option<VolumeDecision>> {
        self.tick_count = self.tick_count.wrapping_add(1);
        debug_if_enabled!("Тик #{}", self.tick_count);

        let state = self.observe();
        if self.last_applied == Some(state) {
            return Ok(None);
        }

        let decision = self.apply(&state)?;
        self.last_applied = Some(state);
        Ok(Some(decision))
    }

    fn apply(&self, state: &ActivityState) -> Result<VolumeDecision> {
        let player = &self.config.player.process_name;
        let decision = state.decision();

        match decision {
            VolumeDecision::NoAction => {
                debug!("{} не запущен", player);
            }
            VolumeDecision::Duck => {
                self.actuator.apply_volume(player, self.config.ducked_volume())?;
                info!(
                    "Тихий режим | Видео: {} | Игра: {}",
                    state.playback_active, state.game_active
                );
            }
            VolumeDecision::Restore => {
                self.actuator.apply_volume(player, self.config.normal_volume())?;
                info!("Нормальная громкость");
            }
        }

        Ok(decision)
    }

    pub async fn run(mut self) -> Result<()> {
        let poll = Duration::from_millis(self.config.monitor.poll_interval_ms);
        let recovery = Duration::from_millis(self.config.monitor.recovery_interval_ms);

        info!(
            "ActivityMonitor запущен (интервал {}ms, восстановление {}ms)",
            poll.as_millis(),
            recovery.as_millis()
        );

        loop {
            let pause = match self.tick() {
                Ok(_) => poll,
                Err(e) => {
                    error!("Критическая ошибка: {}", e);
                    recovery
                }
            };

            sleep(pause).await;
        }
    }
}

#[async_trait::async_trait]
impl MonitorTrait for ActivityMonitor {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::system::fakes::Fakes;

    struct Harness {
        fakes: Fakes,
        monitor: ActivityMonitor,
        _dir: tempfile::TempDir,
    }

    fn harness(games: &[&str]) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.player.process_name = "Spotify".to_string();
        config.volume.ducked = 20;
        config.volume.normal = 80;
        config.monitor.false_positives_file = dir.path().join("false_positives.txt");

        let fakes = Fakes::new();
        let games = GameList::parse(&games.join("\n"));
        let monitor = ActivityMonitor::new(Arc::new(config), &games, fakes.backends());

        Harness {
            fakes,
            monitor,
            _dir: dir,
        }
    }

    #[test]
    fn first_tick_always_decides() {
        let mut h = harness(&[]);

        let decision = h.monitor.tick().unwrap();

        assert_eq!(decision, Some(VolumeDecision::NoAction));
        assert_eq!(h.monitor.last_applied(), Some(ActivityState::new(false, false, false)));
        assert!(h.fakes.mixer.volumes().is_empty());
    }

    #[test]
    fn steady_state_restores_only_once() {
        let mut h = harness(&[]);
        h.fakes.processes.set(&[("spotify", 10)]);

        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Restore));
        assert_eq!(h.monitor.tick().unwrap(), None);
        assert_eq!(h.monitor.tick().unwrap(), None);

        assert_eq!(h.fakes.mixer.volumes(), vec![80]);
    }

    #[test]
    fn game_start_and_stop_duck_then_restore() {
        let mut h = harness(&["valorant"]);
        h.fakes.processes.set(&[("spotify", 10)]);
        h.monitor.tick().unwrap();

        h.fakes.processes.set(&[("spotify", 10), ("VALORANT-Win64-Shipping.exe", 20)]);
        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Duck));
        assert_eq!(h.monitor.tick().unwrap(), None);

        h.fakes.processes.set(&[("spotify", 10)]);
        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Restore));

        assert_eq!(h.fakes.mixer.volumes(), vec![80, 20, 80]);
    }

    #[test]
    fn video_in_browser_ducks() {
        let mut h = harness(&[]);
        h.fakes.processes.set(&[("spotify", 10), ("chrome", 30)]);
        h.fakes.windows.set(30, &["Cool Song - YouTube - Google Chrome"]);

        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Duck));
        assert_eq!(
            h.monitor.last_applied(),
            Some(ActivityState::new(true, true, false))
        );
        assert_eq!(h.fakes.mixer.volumes(), vec![20]);
    }

    #[test]
    fn every_match_is_written_to_diagnostic_log() {
        let mut h = harness(&["valorant", "search"]);
        h.fakes.processes.set(&[("valorant.exe", 20), ("searchindexer.exe", 21)]);

        h.monitor.tick().unwrap();
        h.monitor.tick().unwrap();

        let content =
            std::fs::read_to_string(&h.monitor.config.monitor.false_positives_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.ends_with(": valorant.exe")));
    }

    #[test]
    fn process_query_failure_means_all_false() {
        let mut h = harness(&["valorant"]);
        h.fakes.processes.set(&[("spotify", 10), ("valorant.exe", 20)]);
        *h.fakes.processes.fail.lock() = true;

        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::NoAction));
        assert_eq!(h.monitor.last_applied(), Some(ActivityState::default()));
    }

    #[test]
    fn missing_session_still_counts_as_applied() {
        let mut h = harness(&[]);
        h.fakes.processes.set(&[("spotify", 10)]);
        *h.fakes.mixer.session_present.lock() = false;

        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Restore));
        assert_eq!(h.monitor.tick().unwrap(), None);
        assert_eq!(h.fakes.mixer.volumes().len(), 1);
    }

    async fn let_monitor_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_pauses_for_recovery_and_loop_continues() {
        let Harness { fakes, monitor, _dir } = harness(&["valorant"]);
        assert_eq!(monitor.config.monitor.poll_interval_ms, 500);
        assert_eq!(monitor.config.monitor.recovery_interval_ms, 1000);

        fakes.processes.set(&[("spotify", 10)]);
        *fakes.mixer.fail.lock() = true;

        let task = tokio::spawn(monitor.run());
        let_monitor_run().await;
        assert!(fakes.mixer.volumes().is_empty());

        *fakes.mixer.fail.lock() = false;

        // Опрос раньше паузы восстановления не повторяется
        tokio::time::advance(Duration::from_millis(600)).await;
        let_monitor_run().await;
        assert!(fakes.mixer.volumes().is_empty());

        tokio::time::advance(Duration::from_millis(400)).await;
        let_monitor_run().await;
        assert_eq!(fakes.mixer.volumes(), vec![80]);

        // Дальше обычный интервал опроса
        fakes.processes.set(&[("spotify", 10), ("valorant.exe", 20)]);
        tokio::time::advance(Duration::from_millis(500)).await;
        let_monitor_run().await;
        assert_eq!(fakes.mixer.volumes(), vec![80, 20]);

        assert!(!task.is_finished());
        task.abort();
    }

    #[test]
    fn mixer_failure_is_retried_on_next_tick() {
        let mut h = harness(&[]);
        h.fakes.processes.set(&[("spotify", 10)]);
        *h.fakes.mixer.fail.lock() = true;

        assert!(h.monitor.tick().is_err());
        assert_eq!(h.monitor.last_applied(), None);

        *h.fakes.mixer.fail.lock() = false;
        assert_eq!(h.monitor.tick().unwrap(), Some(VolumeDecision::Restore));
        assert_eq!(h.fakes.mixer.volumes(), vec![80]);
    }
}
