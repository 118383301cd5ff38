//! Backup скрипт: снимок значений на момент запуска в виде самостоятельного
//! POSIX shell скрипта. Пишется один раз до начала мониторинга и больше не трогается.

use crate::config::ShortcutDefinition;
use crate::error::Result;
use crate::services::key_store::KeyStore;
use crate::services::shortcut_state::ShortcutState;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tracing::info;

pub struct BackupWriter {
    path: Option<PathBuf>,
}

impl BackupWriter {
    /// `None` отключает запись
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Текст скрипта: для непустого значения команда записи, для пустого
    /// сброс (пустое чтение неотличимо от значения по умолчанию)
    pub fn render(key_store: &KeyStore, shortcuts: &[ShortcutDefinition], state: &ShortcutState) -> String {
        let mut script = String::from("#!/bin/sh\n");
        for shortcut in shortcuts {
            let command = key_store.restore_command(shortcut, state.get(&shortcut.id));
            script.push_str(&command.to_shell());
            script.push('\n');
        }
        script
    }

    /// Записать, сбросить на диск и закрыть файл. Без пути ничего не делает.
    pub fn write(&self, key_store: &KeyStore, shortcuts: &[ShortcutDefinition], state: &ShortcutState) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let script = Self::render(key_store, shortcuts, state);

        let mut file = fs::File::create(path)?;
        file.write_all(script.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;

        info!("Backup скрипт записан: {:?} ({} сочетаний)", path, shortcuts.len());
        Ok(())
    }
}
