//! Запуск внешних утилит.
//!
//! Два режима вызова:
//! - `query` ждёт завершения и возвращает обрезанный stdout (чтение настроек, pgrep, xprop);
//! - `spawn_detached` только запускает процесс и НЕ ждёт его завершения. Код возврата
//!   никогда не проверяется, поэтому неудачная запись остаётся незамеченной.
//!
//! Всё общение с рабочим столом идёт через `CommandRunner`, чтобы тесты могли
//! подменить его и проверять вызовы без запуска процессов.

use crate::error::{BlockerError, Result};
use smallvec::SmallVec;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Программа и её аргументы
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    pub program: String,
    pub args: SmallVec<[String; 4]>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: SmallVec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Строка для POSIX shell, каждый аргумент экранирован
    pub fn to_shell(&self) -> String {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_shell())
    }
}

pub trait CommandRunner: Send + Sync {
    /// Выполнить команду и дождаться результата. Ненулевой код возврата считается ошибкой.
    fn query(&self, command: &CommandLine) -> Result<String>;

    /// Запустить команду и сразу вернуться, не дожидаясь завершения.
    /// Ошибка возможна только если процесс не удалось запустить.
    fn spawn_detached(&self, command: &CommandLine) -> Result<()>;
}

/// Настоящий запуск процессов
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn query(&self, command: &CommandLine) -> Result<String> {
        let output = Command::new(&command.program)
            .args(command.args.iter())
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            return Err(BlockerError::CommandFailed {
                command: command.to_shell(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn spawn_detached(&self, command: &CommandLine) -> Result<()> {
        debug!("Запуск без ожидания: {}", command);

        // tokio подбирает завершившихся потомков сам после drop(Child), зомби не копятся
        let child = tokio::process::Command::new(&command.program)
            .args(command.args.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        drop(child);

        Ok(())
    }
}

/// Режим сухого запуска: чтение настоящее, запись только логируется
pub struct DryRunCommandRunner {
    inner: SystemCommandRunner,
}

impl DryRunCommandRunner {
    pub fn new() -> Self {
        Self {
            inner: SystemCommandRunner::new(),
        }
    }
}

impl CommandRunner for DryRunCommandRunner {
    fn query(&self, command: &CommandLine) -> Result<String> {
        self.inner.query(command)
    }

    fn spawn_detached(&self, command: &CommandLine) -> Result<()> {
        info!("[DRY RUN] {}", command);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Поддельный рабочий стол: помнит значения gsettings/dconf, список PID
    //! целевого процесса и активное окно, записывает все вызовы.

    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeState {
        values: HashMap<String, String>,
        defaults: HashMap<String, String>,
        target_pids: Vec<u32>,
        active_window: Option<(String, Option<u32>)>,
        queries: Vec<CommandLine>,
        detached: Vec<CommandLine>,
    }

    #[derive(Default)]
    pub struct FakeDesktop {
        state: Mutex<FakeState>,
    }

    impl FakeDesktop {
        pub fn new() -> Self {
            Self::default()
        }

        /// Значение по умолчанию для ключа gsettings ("schema key") или пути dconf
        pub fn set_default(&self, key: &str, value: &str) {
            self.state.lock().defaults.insert(key.to_string(), value.to_string());
        }

        pub fn set_value(&self, key: &str, value: &str) {
            self.state.lock().values.insert(key.to_string(), value.to_string());
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.state.lock().values.get(key).cloned()
        }

        pub fn set_target_pids(&self, pids: &[u32]) {
            self.state.lock().target_pids = pids.to_vec();
        }

        pub fn set_active_window(&self, window_id: &str, pid: Option<u32>) {
            self.state.lock().active_window = Some((window_id.to_string(), pid));
        }

        pub fn clear_active_window(&self) {
            self.state.lock().active_window = None;
        }

        pub fn queries(&self) -> Vec<CommandLine> {
            self.state.lock().queries.clone()
        }

        pub fn detached(&self) -> Vec<CommandLine> {
            self.state.lock().detached.clone()
        }

        pub fn clear_log(&self) {
            let mut state = self.state.lock();
            state.queries.clear();
            state.detached.clear();
        }

        fn failed(command: &CommandLine) -> BlockerError {
            BlockerError::CommandFailed {
                command: command.to_shell(),
                stderr: "fake failure".to_string(),
            }
        }
    }

    impl CommandRunner for FakeDesktop {
        fn query(&self, command: &CommandLine) -> Result<String> {
            let mut state = self.state.lock();
            state.queries.push(command.clone());

            let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
            match (command.program.as_str(), args.as_slice()) {
                ("gsettings", ["get", rest @ ..]) => {
                    let key = rest.join(" ");
                    state
                        .values
                        .get(&key)
                        .or_else(|| state.defaults.get(&key))
                        .cloned()
                        .ok_or_else(|| Self::failed(command))
                }
                ("dconf", ["read", path]) => Ok(state.values.get(*path).cloned().unwrap_or_default()),
                ("pgrep", ["-f", _]) => {
                    if state.target_pids.is_empty() {
                        Err(Self::failed(command))
                    } else {
                        let pids: Vec<String> = state.target_pids.iter().map(u32::to_string).collect();
                        Ok(pids.join("\n"))
                    }
                }
                ("xdotool", ["getactivewindow"]) => state
                    .active_window
                    .as_ref()
                    .map(|(id, _)| id.clone())
                    .ok_or_else(|| Self::failed(command)),
                ("xprop", ["-id", id]) => match &state.active_window {
                    Some((active_id, pid)) if active_id.as_str() == *id => {
                        let mut out = String::from("WM_CLASS(STRING) = \"fake\", \"Fake\"\n");
                        if let Some(pid) = pid {
                            out.push_str(&format!("_NET_WM_PID(CARDINAL) = {}\n", pid));
                        }
                        Ok(out.trim().to_string())
                    }
                    _ => Err(Self::failed(command)),
                },
                _ => Err(Self::failed(command)),
            }
        }

        fn spawn_detached(&self, command: &CommandLine) -> Result<()> {
            let mut state = self.state.lock();
            state.detached.push(command.clone());

            let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
            match (command.program.as_str(), args.as_slice()) {
                ("gsettings", ["set", schema, key, value]) => {
                    state.values.insert(format!("{} {}", schema, key), value.to_string());
                }
                ("gsettings", ["reset", rest @ ..]) => {
                    state.values.remove(&rest.join(" "));
                }
                ("dconf", ["write", path, value]) => {
                    state.values.insert(path.to_string(), value.to_string());
                }
                ("dconf", ["reset", path]) => {
                    state.values.remove(*path);
                }
                _ => {}
            }

            Ok(())
        }
    }
}
