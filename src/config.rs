use crate::blocker_error;
use crate::error::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Хранилище, в котором живёт сочетание клавиш.
///
/// Неизвестный тег отклоняется ещё при десериализации, поэтому
/// дальше по коду сопоставление всегда исчерпывающее.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Плоское key-value хранилище (`gsettings`), путь режется на позиционные аргументы
    #[serde(alias = "simple")]
    Gsettings,
    /// Иерархическое хранилище (`dconf`), путь передаётся целиком
    #[serde(alias = "tree")]
    Dconf,
}

impl Backend {
    pub fn program(&self) -> &'static str {
        match self {
            Backend::Gsettings => "gsettings",
            Backend::Dconf => "dconf",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ShortcutDefinition {
    pub id: String,
    pub backend: Backend,
}

impl ShortcutDefinition {
    pub fn new(id: impl Into<String>, backend: Backend) -> Self {
        Self {
            id: id.into(),
            backend,
        }
    }

    pub fn gsettings(id: impl Into<String>) -> Self {
        Self::new(id, Backend::Gsettings)
    }

    pub fn dconf(id: impl Into<String>) -> Self {
        Self::new(id, Backend::Dconf)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub target: TargetConfig,
    pub backup: BackupConfig,
    pub polling: PollingConfig,
    pub shortcuts: Vec<ShortcutDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Шаблон для `pgrep -f`, сопоставляется с полной командной строкой
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Пустая строка отключает backup скрипт
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "full".to_string(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            pattern: ".*idea.Main.*".to_string(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            path: "~/.keymap_backup".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            target: TargetConfig::default(),
            backup: BackupConfig::default(),
            polling: PollingConfig::default(),
            shortcuts: default_shortcuts(),
        }
    }
}

/// Набор сочетаний, которые GNOME перехватывает у IDE чаще всего
fn default_shortcuts() -> Vec<ShortcutDefinition> {
    const GSETTINGS_KEYS: &[&str] = &[
        // CTRL + ALT + Backspace
        "org.gnome.settings-daemon.plugins.media-keys/logout",
        // CTRL + ALT + L
        "org.gnome.settings-daemon.plugins.media-keys/screensaver",
        // CTRL + ALT + T
        "org.gnome.settings-daemon.plugins.media-keys/terminal",
        // ALT + F6
        "org.gnome.desktop.wm.keybindings/cycle-group",
        // ALT + F7
        "org.gnome.desktop.wm.keybindings/begin-move",
        // ALT + F8
        "org.gnome.desktop.wm.keybindings/begin-resize",
        // CTRL + ALT + S
        "org.gnome.desktop.wm.keybindings/toggle-shaded",
        "org.gnome.desktop.wm.keybindings/move-to-workspace-left",
        "org.gnome.desktop.wm.keybindings/move-to-workspace-right",
        "org.gnome.desktop.wm.keybindings/move-to-workspace-up",
        "org.gnome.desktop.wm.keybindings/move-to-workspace-down",
        "org.gnome.desktop.wm.keybindings/panel-main-menu",
        "org.gnome.desktop.wm.keybindings/toggle-maximized",
        "org.gnome.desktop.wm.keybindings/unmaximize",
        "org.gnome.desktop.wm.keybindings/activate-window-menu",
        "org.gnome.desktop.wm.keybindings/cycle-group-backward",
        "org.gnome.desktop.wm.keybindings/cycle-panels",
        // ALT + `
        "org.gnome.desktop.wm.keybindings/switch-group",
        "org.gnome.desktop.wm.keybindings/switch-group-backward",
        "org.gnome.desktop.wm.keybindings/switch-panels",
        "org.gnome.desktop.wm.keybindings/switch-panels-backward",
        "org.gnome.desktop.wm.keybindings/switch-to-workspace-up",
        "org.gnome.desktop.wm.keybindings/switch-to-workspace-down",
    ];

    let mut shortcuts: Vec<ShortcutDefinition> = GSETTINGS_KEYS
        .iter()
        .map(|id| ShortcutDefinition::gsettings(*id))
        .collect();

    // SUPER + S
    shortcuts.push(ShortcutDefinition::dconf(
        "/org/gnome/shell/keybindings/toggle-overview",
    ));

    shortcuts
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SHORTCUT_BLOCKER_").split("__"));

        Self::from_figment(figment).map_err(|e| match e {
            crate::error::BlockerError::Config(msg) => {
                blocker_error!(config, "{:?}: {}", config_path, msg)
            }
            other => other,
        })
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment
            .extract()
            .map_err(|e| blocker_error!(config, "{}", e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(blocker_error!(config, "Неверный уровень логирования: {}", self.logging.level)),
        }

        match self.logging.format.as_str() {
            "full" | "compact" => {}
            _ => return Err(blocker_error!(config, "Неверный формат логирования: {}", self.logging.format)),
        }

        if self.target.pattern.trim().is_empty() {
            return Err(blocker_error!(config, "target.pattern не может быть пустым"));
        }
        regex::Regex::new(&self.target.pattern).map_err(|e| {
            blocker_error!(config, "target.pattern не является регулярным выражением: {}", e)
        })?;

        if self.polling.interval_ms < 50 {
            return Err(blocker_error!(config, "polling.interval_ms должно быть минимум 50"));
        }

        if self.shortcuts.is_empty() {
            return Err(blocker_error!(config, "Не задано ни одного сочетания клавиш"));
        }

        let mut seen = HashSet::new();
        for (i, shortcut) in self.shortcuts.iter().enumerate() {
            validate_shortcut_id(shortcut).map_err(|msg| {
                blocker_error!(config, "Сочетание #{} ({}): {}", i + 1, shortcut.id, msg)
            })?;

            if !seen.insert(shortcut.id.as_str()) {
                return Err(blocker_error!(config, "Сочетание '{}' указано дважды", shortcut.id));
            }
        }

        Ok(())
    }

    /// Путь к backup скрипту с раскрытым `~`, `None` если backup отключён
    pub fn backup_path(&self) -> Option<PathBuf> {
        let raw = self.backup.path.trim();
        if raw.is_empty() {
            return None;
        }

        if raw == "~" {
            return dirs::home_dir();
        }

        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return Some(home.join(rest));
            }
        }

        Some(PathBuf::from(raw))
    }

    /// Бэкенды, реально используемые конфигурацией (в порядке первого появления)
    pub fn used_backends(&self) -> Vec<Backend> {
        let mut backends = Vec::new();
        for shortcut in &self.shortcuts {
            if !backends.contains(&shortcut.backend) {
                backends.push(shortcut.backend);
            }
        }
        backends
    }
}

fn validate_shortcut_id(shortcut: &ShortcutDefinition) -> std::result::Result<(), &'static str> {
    let id = shortcut.id.as_str();
    if id.trim().is_empty() {
        return Err("пустой идентификатор");
    }

    match shortcut.backend {
        Backend::Gsettings => {
            let segments: Vec<&str> = id.split('/').collect();
            if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
                return Err("для gsettings ожидается формат 'schema/key'");
            }
        }
        Backend::Dconf => {
            if !id.starts_with('/') || id.ends_with('/') {
                return Err("для dconf ожидается абсолютный путь к ключу, например '/org/gnome/...'");
            }
        }
    }

    Ok(())
}
