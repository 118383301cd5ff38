use crate::config::{Backend, ShortcutDefinition};
use crate::debug_if_enabled;
use crate::services::command_runner::{CommandLine, CommandRunner};
use std::sync::Arc;
use tracing::warn;

use super::dconf::DconfBackend;
use super::gsettings::GsettingsBackend;
use super::r#trait::StoreBackend;

/// Сериализованное значение сочетания в формате бэкенда.
/// Пустая строка означает "значение по умолчанию".
pub type ShortcutValue = String;

pub struct KeyStore {
    runner: Arc<dyn CommandRunner>,
    gsettings: GsettingsBackend,
    dconf: DconfBackend,
}

impl KeyStore {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            gsettings: GsettingsBackend::new(),
            dconf: DconfBackend::new(),
        }
    }

    fn backend(&self, kind: Backend) -> &dyn StoreBackend {
        match kind {
            Backend::Gsettings => &self.gsettings,
            Backend::Dconf => &self.dconf,
        }
    }

    /// Текущее значение. Любая ошибка запроса даёт пустую строку.
    pub fn read(&self, shortcut: &ShortcutDefinition) -> ShortcutValue {
        let command = self.backend(shortcut.backend).read_command(&shortcut.id);
        match self.runner.query(&command) {
            Ok(value) => value,
            Err(e) => {
                debug_if_enabled!("Не удалось прочитать {} ({}): {}", shortcut.id, shortcut.backend, e);
                ShortcutValue::new()
            }
        }
    }

    /// Записать значение без ожидания результата. Пустое значение заменяется
    /// на явную отвязку сочетания.
    pub fn write(&self, shortcut: &ShortcutDefinition, value: &str) {
        let backend = self.backend(shortcut.backend);
        let value = if value.is_empty() {
            backend.unbound_value()
        } else {
            value
        };
        self.launch(backend.write_command(&shortcut.id, value));
    }

    /// Вернуть системное значение по умолчанию, без ожидания результата
    pub fn reset(&self, shortcut: &ShortcutDefinition) {
        let command = self.backend(shortcut.backend).reset_command(&shortcut.id);
        self.launch(command);
    }

    /// Вернуть ранее прочитанное значение: непустое записывается, пустое сбрасывается
    pub fn restore(&self, shortcut: &ShortcutDefinition, value: &str) {
        if value.is_empty() {
            self.reset(shortcut);
        } else {
            self.write(shortcut, value);
        }
    }

    /// Команда, которая приводит сочетание к `value`. Используется и для
    /// восстановления, и для backup скрипта.
    pub fn restore_command(&self, shortcut: &ShortcutDefinition, value: &str) -> CommandLine {
        let backend = self.backend(shortcut.backend);
        if value.is_empty() {
            backend.reset_command(&shortcut.id)
        } else {
            backend.write_command(&shortcut.id, value)
        }
    }

    fn launch(&self, command: CommandLine) {
        debug_if_enabled!("Команда: {}", command);
        if let Err(e) = self.runner.spawn_detached(&command) {
            warn!("Не удалось запустить `{}`: {}", command, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::command_runner::testing::FakeDesktop;

    const GS_ID: &str = "org.gnome.desktop.wm.keybindings/begin-move";
    const GS_KEY: &str = "org.gnome.desktop.wm.keybindings begin-move";
    const DCONF_ID: &str = "/org/gnome/shell/keybindings/toggle-overview";

    fn store() -> (Arc<FakeDesktop>, KeyStore) {
        let desktop = Arc::new(FakeDesktop::new());
        let store = KeyStore::new(desktop.clone());
        (desktop, store)
    }

    #[test]
    fn test_read_after_write_round_trip() {
        let (_desktop, store) = store();
        let gs = ShortcutDefinition::gsettings(GS_ID);
        let dc = ShortcutDefinition::dconf(DCONF_ID);

        store.write(&gs, "['<Alt>F7']");
        store.write(&dc, "['<Super>s']");

        assert_eq!(store.read(&gs), "['<Alt>F7']");
        assert_eq!(store.read(&dc), "['<Super>s']");
    }

    #[test]
    fn test_read_failure_is_empty() {
        let (desktop, store) = store();
        assert_eq!(store.read(&ShortcutDefinition::gsettings("org.gnome.missing/key")), "");
        assert_eq!(desktop.queries().len(), 1);
    }

    #[test]
    fn test_empty_write_uses_unbind_sentinel() {
        let (desktop, store) = store();
        let gs = ShortcutDefinition::gsettings(GS_ID);
        let dc = ShortcutDefinition::dconf(DCONF_ID);

        store.write(&gs, "");
        store.write(&dc, "");

        assert_eq!(desktop.value(GS_KEY).as_deref(), Some("['']"));
        assert_eq!(desktop.value(DCONF_ID).as_deref(), Some("['']"));

        let detached = desktop.detached();
        assert_eq!(detached.len(), 2);
        assert!(detached.iter().all(|c| c.args.last().map(String::as_str) == Some("['']")));
    }

    #[test]
    fn test_reset_reverts_to_default() {
        let (desktop, store) = store();
        let gs = ShortcutDefinition::gsettings(GS_ID);
        desktop.set_default(GS_KEY, "['<Alt>F7']");
        desktop.set_value(GS_KEY, "['<Alt>F9']");

        store.reset(&gs);

        assert_eq!(desktop.value(GS_KEY), None);
        assert_eq!(store.read(&gs), "['<Alt>F7']");
    }

    #[test]
    fn test_restore_command_for_empty_value_is_reset() {
        let (_desktop, store) = store();
        let dc = ShortcutDefinition::dconf(DCONF_ID);

        assert_eq!(store.restore_command(&dc, "").args.as_slice(), ["reset", DCONF_ID]);
        assert_eq!(
            store.restore_command(&dc, "['<Super>s']").args.as_slice(),
            ["write", DCONF_ID, "['<Super>s']"]
        );
    }
}
