use crate::blocker_error;
use crate::error::Result;
use crate::services::command_runner::{CommandLine, CommandRunner};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

static NET_WM_PID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^_NET_WM_PID\(CARDINAL\)\s*=\s*(\d+)").expect("valid _NET_WM_PID regex")
});

/// PID владельца активного окна: `xdotool getactivewindow`, затем `xprop -id`
pub struct ActiveWindowLocator {
    runner: Arc<dyn CommandRunner>,
}

impl ActiveWindowLocator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn active_pid(&self) -> Result<u32> {
        let window_id = self
            .runner
            .query(&CommandLine::new("xdotool").arg("getactivewindow"))?;

        if window_id.is_empty() {
            return Err(blocker_error!(parse, "xdotool вернул пустой идентификатор окна"));
        }
        debug!("Активное окно: {}", window_id);

        let properties = self
            .runner
            .query(&CommandLine::new("xprop").args(["-id", window_id.as_str()]))?;

        parse_net_wm_pid(&properties)
            .ok_or_else(|| blocker_error!(parse, "у окна {} нет свойства _NET_WM_PID", window_id))
    }
}

fn parse_net_wm_pid(properties: &str) -> Option<u32> {
    NET_WM_PID
        .captures(properties)
        .and_then(|caps| caps.get(1))
        .and_then(|pid| pid.as_str().parse().ok())
}
