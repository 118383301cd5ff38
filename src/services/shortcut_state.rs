use crate::config::ShortcutDefinition;
use crate::services::key_store::{KeyStore, ShortcutValue};
use indexmap::IndexMap;

/// Последние прочитанные значения сочетаний, в порядке конфигурации.
/// Принадлежит только контроллеру и нигде не сохраняется.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutState {
    values: IndexMap<String, ShortcutValue>,
}

impl ShortcutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Прочитать все сочетания из хранилища
    pub fn capture(key_store: &KeyStore, shortcuts: &[ShortcutDefinition]) -> Self {
        let mut state = Self::new();
        for shortcut in shortcuts {
            state.set(&shortcut.id, key_store.read(shortcut));
        }
        state
    }

    pub fn set(&mut self, id: &str, value: ShortcutValue) {
        self.values.insert(id.to_string(), value);
    }

    /// Пустая строка, если значение не известно
    pub fn get(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::command_runner::testing::FakeDesktop;
    use std::sync::Arc;

    #[test]
    fn test_capture_keeps_config_order_and_empty_values() {
        let desktop = Arc::new(FakeDesktop::new());
        desktop.set_default("org.gnome.desktop.wm.keybindings begin-move", "['<Alt>F7']");
        let store = KeyStore::new(desktop.clone());

        let shortcuts = vec![
            ShortcutDefinition::gsettings("org.gnome.desktop.wm.keybindings/begin-move"),
            ShortcutDefinition::dconf("/org/gnome/shell/keybindings/toggle-overview"),
        ];
        let state = ShortcutState::capture(&store, &shortcuts);

        let captured: Vec<(&str, &str)> = state.iter().collect();
        assert_eq!(
            captured,
            vec![
                ("org.gnome.desktop.wm.keybindings/begin-move", "['<Alt>F7']"),
                ("/org/gnome/shell/keybindings/toggle-overview", ""),
            ]
        );
        assert_eq!(state.get("unknown"), "");
    }
}
