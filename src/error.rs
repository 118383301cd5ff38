use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlockerError {
    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не найдена необходимая утилита: {0}")]
    MissingDependency(String),

    #[error("Команда `{command}` завершилась с ошибкой: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Не удалось разобрать вывод: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, BlockerError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! blocker_error {
    (config, $($arg:tt)*) => {
        $crate::error::BlockerError::Config(format!($($arg)*))
    };
    (missing_dependency, $($arg:tt)*) => {
        $crate::error::BlockerError::MissingDependency(format!($($arg)*))
    };
    (parse, $($arg:tt)*) => {
        $crate::error::BlockerError::Parse(format!($($arg)*))
    };
}
