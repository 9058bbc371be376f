//! ActivityMonitor service: responsibility and boundaries
//!
//! This module owns the polling loop and the last applied ActivityState. Each
//! tick it combines "player running", "playback active" and "game active" into
//! one ActivityState and, only when that state changed, applies exactly one
//! volume decision through VolumeActuator. OS queries live in services::system.

mod activity_monitor;
mod r#trait;

pub use self::activity_monitor::ActivityMonitor;
pub use self::r#trait::{create_activity_monitor, MonitorTrait};
