//! KeyStore: чтение, запись и сброс одного сочетания клавиш.
//!
//! Каждый бэкенд (gsettings, dconf) только строит командные строки.
//! Запуск процессов и обработка ошибок собраны в `KeyStore`.

mod dconf;
mod gsettings;
mod key_store;
mod r#trait;

pub use self::key_store::{KeyStore, ShortcutValue};
