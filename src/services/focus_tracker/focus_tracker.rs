use crate::error::Result;
use crate::services::command_runner::CommandRunner;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::pgrep::ProcessMatcher;
use super::r#trait::FocusTrackerTrait;
use super::xdotool::ActiveWindowLocator;

pub struct RealFocusTracker {
    matcher: ProcessMatcher,
    locator: ActiveWindowLocator,
    // Чтобы не засорять лог предупреждением на каждом опросе
    lookup_failing: bool,
}

impl RealFocusTracker {
    pub fn new(pattern: &str, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        info!("Инициализация RealFocusTracker, шаблон процесса: '{}'", pattern);

        Ok(Self {
            matcher: ProcessMatcher::new(runner.clone(), pattern),
            locator: ActiveWindowLocator::new(runner),
            lookup_failing: false,
        })
    }

    fn check_focus(&mut self) -> bool {
        let pids = self.matcher.matching_pids();
        if pids.is_empty() {
            // Окно не опрашиваем, если целевой процесс не запущен
            return false;
        }

        match self.locator.active_pid() {
            Ok(active_pid) => {
                if self.lookup_failing {
                    info!("PID активного окна снова определяется");
                    self.lookup_failing = false;
                }
                let focused = pids.contains(&active_pid);
                debug!("PID активного окна {}, совпадения {:?} -> {}", active_pid, pids, focused);
                focused
            }
            Err(e) => {
                if !self.lookup_failing {
                    warn!("Не удалось получить PID активного окна: {}", e);
                    self.lookup_failing = true;
                } else {
                    debug!("Не удалось получить PID активного окна: {}", e);
                }
                false
            }
        }
    }
}

#[async_trait::async_trait]
impl FocusTrackerTrait for RealFocusTracker {
    async fn is_target_focused(&mut self) -> bool {
        self.check_focus()
    }
}
