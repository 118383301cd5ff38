use crate::services::command_runner::CommandLine;

use super::r#trait::StoreBackend;

/// `gsettings get|set|reset <schema> <key> [value]`
pub struct GsettingsBackend;

impl GsettingsBackend {
    pub fn new() -> Self {
        Self
    }

    /// "org.gnome.desktop.wm.keybindings/begin-move" -> ["org.gnome.desktop.wm.keybindings", "begin-move"]
    fn segments(id: &str) -> impl Iterator<Item = &str> {
        id.split('/')
    }

    fn command(verb: &str, id: &str) -> CommandLine {
        CommandLine::new("gsettings").arg(verb).args(Self::segments(id))
    }
}

impl StoreBackend for GsettingsBackend {
    fn read_command(&self, id: &str) -> CommandLine {
        Self::command("get", id)
    }

    fn write_command(&self, id: &str, value: &str) -> CommandLine {
        Self::command("set", id).arg(value)
    }

    fn reset_command(&self, id: &str) -> CommandLine {
        Self::command("reset", id)
    }

    fn unbound_value(&self) -> &'static str {
        "['']"
    }
}
