pub mod activity;
pub mod window;

pub use activity::{ActivityState, VolumeDecision};
pub use window::{ProcessInfo, WindowInfo};
