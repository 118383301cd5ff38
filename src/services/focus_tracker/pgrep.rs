use crate::services::command_runner::{CommandLine, CommandRunner};
use std::sync::Arc;
use tracing::debug;

/// Поиск PID процессов, чья командная строка совпадает с шаблоном (`pgrep -f`)
pub struct ProcessMatcher {
    runner: Arc<dyn CommandRunner>,
    pattern: String,
}

impl ProcessMatcher {
    pub fn new(runner: Arc<dyn CommandRunner>, pattern: impl Into<String>) -> Self {
        Self {
            runner,
            pattern: pattern.into(),
        }
    }

    /// Пустой список, если совпадений нет или pgrep не отработал
    pub fn matching_pids(&self) -> Vec<u32> {
        let command = CommandLine::new("pgrep").args(["-f", self.pattern.as_str()]);

        // pgrep завершается с кодом 1, когда ничего не найдено
        let output = match self.runner.query(&command) {
            Ok(output) => output,
            Err(e) => {
                debug!("pgrep не нашёл процессов по шаблону '{}': {}", self.pattern, e);
                return Vec::new();
            }
        };

        parse_pids(&output)
    }
}

fn parse_pids(output: &str) -> Vec<u32> {
    output
        .lines()
        .filter_map(|line| line.trim().parse::<u32>().ok())
        .collect()
}
