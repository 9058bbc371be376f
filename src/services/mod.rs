pub mod activity_monitor;
pub mod diagnostics;
pub mod game_matcher;
pub mod playback_detector;
pub mod system;
pub mod volume_actuator;

pub use activity_monitor::{create_activity_monitor, ActivityMonitor};
pub use game_matcher::GameMatcher;
pub use playback_detector::PlaybackDetector;
pub use volume_actuator::{Volume, VolumeActuator};
