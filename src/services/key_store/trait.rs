use crate::services::command_runner::CommandLine;

/// Построение команд для конкретного хранилища настроек
pub trait StoreBackend: Send + Sync {
    fn read_command(&self, id: &str) -> CommandLine;

    fn write_command(&self, id: &str, value: &str) -> CommandLine;

    fn reset_command(&self, id: &str) -> CommandLine;

    /// Значение, явно отвязывающее сочетание. Это не то же самое, что
    /// сброс: сброс возвращает системное значение по умолчанию.
    fn unbound_value(&self) -> &'static str;
}
