use crate::config::Config;
use crate::error::Result;
use crate::services::command_runner::CommandRunner;
use std::sync::Arc;

/// Trait for focus trackers polled by the controller
#[async_trait::async_trait]
pub trait FocusTrackerTrait {
    /// Whether the target application owns the focused window right now.
    /// Lookup failures are reported as `false`, never as errors.
    async fn is_target_focused(&mut self) -> bool;
}

/// Factory function to create a focus tracker: the real one, or a simulated
/// one that toggles focus on a fixed schedule
pub fn create_focus_tracker(
    config: Arc<Config>,
    runner: Arc<dyn CommandRunner>,
    simulate: bool,
) -> Result<Box<dyn FocusTrackerTrait + Send>> {
    if simulate {
        Ok(Box::new(super::simulated::SimulatedFocusTracker::new(
            super::simulated::DEFAULT_TOGGLE_EVERY,
        )))
    } else {
        Ok(Box::new(super::focus_tracker::RealFocusTracker::new(
            &config.target.pattern,
            runner,
        )?))
    }
}
