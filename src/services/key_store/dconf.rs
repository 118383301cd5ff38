use crate::services::command_runner::CommandLine;

use super::r#trait::StoreBackend;

/// `dconf read|write|reset <path> [value]`, путь передаётся целиком
pub struct DconfBackend;

impl DconfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl StoreBackend for DconfBackend {
    fn read_command(&self, id: &str) -> CommandLine {
        CommandLine::new("dconf").args(["read", id])
    }

    fn write_command(&self, id: &str, value: &str) -> CommandLine {
        CommandLine::new("dconf").args(["write", id, value])
    }

    fn reset_command(&self, id: &str) -> CommandLine {
        CommandLine::new("dconf").args(["reset", id])
    }

    fn unbound_value(&self) -> &'static str {
        "['']"
    }
}
