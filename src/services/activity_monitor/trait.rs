use crate::config::Config;
use crate::error::Result;
use crate::game_list::GameList;
use crate::services::system::create_system_backends;
use std::sync::Arc;

use super::ActivityMonitor;

/// Trait for monitors that run the polling loop until the process is killed
#[async_trait::async_trait]
pub trait MonitorTrait {
    /// Run the monitor
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create the activity monitor based on the dry_run flag
pub fn create_activity_monitor(
    config: Arc<Config>,
    games: &GameList,
    dry_run: bool,
) -> Result<Box<dyn MonitorTrait + Send>> {
    let backends = create_system_backends(dry_run)?;
    Ok(Box::new(ActivityMonitor::new(config, games, backends)))
}
