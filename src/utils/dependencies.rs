use crate::config::Config;
use crate::error::{BlockerError, Result};
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Утилиты, без которых не работает определение фокуса
const FOCUS_TOOLS: &[&str] = &["pgrep", "xdotool", "xprop"];

/// Проверить наличие всех внешних утилит до входа в цикл опроса
pub fn check_dependencies(config: &Config, simulate_focus: bool) -> Result<()> {
    info!("Проверка внешних утилит...");

    let path_var = env::var_os("PATH").unwrap_or_default();
    let search_dirs: Vec<PathBuf> = env::split_paths(&path_var).collect();

    check_dependencies_in(config, simulate_focus, &search_dirs)?;

    info!("Все внешние утилиты найдены");
    Ok(())
}

/// То же, что `check_dependencies`, но поиск идёт по заданным каталогам
fn check_dependencies_in(config: &Config, simulate_focus: bool, search_dirs: &[PathBuf]) -> Result<()> {
    let mut required: Vec<&str> = config.used_backends().iter().map(|b| b.program()).collect();
    if !simulate_focus {
        required.extend_from_slice(FOCUS_TOOLS);
    }

    let missing: Vec<&str> = required
        .into_iter()
        .filter(|tool| find_in_dirs(tool, search_dirs).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(BlockerError::MissingDependency(format!(
            "{} (установите пакеты xdotool, x11-utils, procps, libglib2.0-bin, dconf-cli)",
            missing.join(", ")
        )));
    }

    Ok(())
}

fn find_in_dirs(tool: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortcutDefinition;

    fn install(dir: &Path, tools: &[&str]) {
        for tool in tools {
            let path = dir.join(tool);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn dconf_only() -> Config {
        let mut config = Config::default();
        config.shortcuts = vec![ShortcutDefinition::dconf("/org/gnome/shell/keybindings/toggle-overview")];
        config
    }

    #[test]
    fn test_find_in_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("xdotool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        let dirs = vec![dir.path().to_path_buf()];
        assert_eq!(find_in_dirs("xdotool", &dirs), None);

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_in_dirs("xdotool", &dirs), Some(tool));
        assert_eq!(find_in_dirs("xprop", &dirs), None);
    }

    #[test]
    fn test_missing_focus_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &["gsettings", "dconf", "pgrep", "xdotool"]);
        let dirs = vec![dir.path().to_path_buf()];

        let result = check_dependencies_in(&Config::default(), false, &dirs);
        match result {
            Err(BlockerError::MissingDependency(msg)) => {
                assert!(msg.starts_with("xprop ("));
            }
            other => panic!("ожидалась MissingDependency, получено {:?}", other),
        }
    }

    #[test]
    fn test_simulated_focus_needs_only_backends() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &["gsettings", "dconf"]);
        let dirs = vec![dir.path().to_path_buf()];

        assert!(check_dependencies_in(&Config::default(), true, &dirs).is_ok());
        assert!(matches!(
            check_dependencies_in(&Config::default(), false, &dirs),
            Err(BlockerError::MissingDependency(_))
        ));
    }

    #[test]
    fn test_dconf_only_config_does_not_need_gsettings() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &["dconf", "pgrep", "xdotool", "xprop"]);
        let dirs = vec![dir.path().to_path_buf()];

        assert!(check_dependencies_in(&dconf_only(), false, &dirs).is_ok());
        assert!(check_dependencies_in(&Config::default(), false, &dirs).is_err());
    }
}
