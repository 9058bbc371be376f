use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod game_list;
mod services;
mod utils;

use config::Config;
use game_list::GameList;
use services::{create_activity_monitor, ActivityMonitor};

#[derive(Parser, Debug)]
#[command(name = "music-ducker")]
#[command(about = "Приглушает музыкальный плеер во время игр и просмотра видео")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "ducker.toml")]
    config: String,

    /// Режим сухого запуска (громкость не меняется)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Выполнить один тик, вывести состояние и выйти
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
        config.validate()?;
    }

    // Инициализация системы логирования
    init_tracing(&config)?;

    info!("Запуск music-ducker v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    let games = GameList::load(&config.monitor.games_file)?;
    info!(
        "Запуск с настройками: player={}, set_vol={}, normal_vol={}, игр={}",
        config.player.process_name,
        config.ducked_volume(),
        config.normal_volume(),
        games.len()
    );

    let config = Arc::new(config);

    if args.once {
        return run_once(config, &games, args.dry_run);
    }

    let monitor = create_activity_monitor(config, &games, args.dry_run)?;

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                error!("Ошибка в ActivityMonitor: {}", e);
            }
        }
        signal_result = signal::ctrl_c() => {
            match signal_result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    }

    info!("music-ducker завершил работу");
    Ok(())
}

fn run_once(config: Arc<Config>, games: &GameList, dry_run: bool) -> Result<()> {
    let backends = services::system::create_system_backends(dry_run)?;
    let mut monitor = ActivityMonitor::new(config, games, backends);

    let decision = monitor.tick()?;
    match (monitor.last_applied(), decision) {
        (Some(state), Some(decision)) => println!("{} => {}", state, decision),
        _ => println!("Состояние не определено"),
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format == "full" {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    Ok(())
}
