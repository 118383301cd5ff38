use crate::config::Config;
use crate::error::Result;
use crate::events::{FocusEvent, FocusTransition};
use crate::services::focus_tracker::FocusTrackerTrait;
use crate::services::key_store::KeyStore;
use crate::services::shortcut_state::ShortcutState;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Состояние сочетаний клавиш
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    /// Сочетания работают как обычно
    #[default]
    Unblocked,
    /// Сочетания отвязаны, пока целевое приложение в фокусе
    Blocked,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockState::Unblocked => write!(f, "Unblocked"),
            BlockState::Blocked => write!(f, "Blocked"),
        }
    }
}

/// Опрашивает FocusTracker и отключает/возвращает сочетания только на фронтах.
///
/// Стартует в `Unblocked`, поэтому первый опрос с `false` ничего не делает:
/// восстанавливать до первой блокировки нечего.
pub struct ShortcutController {
    config: Arc<Config>,
    key_store: KeyStore,
    tracker: Box<dyn FocusTrackerTrait + Send>,
    state: ShortcutState,
    block_state: BlockState,
}

impl ShortcutController {
    pub fn new(
        config: Arc<Config>,
        key_store: KeyStore,
        tracker: Box<dyn FocusTrackerTrait + Send>,
        state: ShortcutState,
    ) -> Self {
        info!("Инициализация ShortcutController ({} сочетаний)", config.shortcuts.len());

        Self {
            config,
            key_store,
            tracker,
            state,
            block_state: BlockState::Unblocked,
        }
    }

    pub fn block_state(&self) -> BlockState {
        self.block_state
    }

    pub fn shortcut_state(&self) -> &ShortcutState {
        &self.state
    }

    /// Обработать одно наблюдение фокуса. Возвращает событие, только если
    /// состояние действительно сменилось.
    pub fn apply_focus(&mut self, focused: bool) -> Option<FocusEvent> {
        let blocked = self.block_state == BlockState::Blocked;
        if focused == blocked {
            return None;
        }

        let event = FocusEvent::new(FocusTransition::from_focus(focused));
        info!("Целевое приложение: {}", event.transition);
        debug!("Событие фокуса: {}, состояние до: {}", event, self.block_state);

        match event.transition {
            FocusTransition::Gained => self.block_all(),
            FocusTransition::Lost => self.restore_all(),
        }

        Some(event)
    }

    /// Один опрос FocusTracker
    pub async fn poll_once(&mut self) -> Option<FocusEvent> {
        let focused = self.tracker.is_target_focused().await;
        self.apply_focus(focused)
    }

    fn block_all(&mut self) {
        for shortcut in &self.config.shortcuts {
            // Перечитываем: пользователь мог поменять сочетание с момента прошлого снимка
            let current = self.key_store.read(shortcut);
            debug!("Отключение {} (было '{}')", shortcut.id, current);
            self.state.set(&shortcut.id, current);
            self.key_store.write(shortcut, "");
        }

        self.block_state = BlockState::Blocked;
        info!("Отключено {} сочетаний", self.config.shortcuts.len());
    }

    fn restore_all(&mut self) {
        for shortcut in &self.config.shortcuts {
            let value = self.state.get(&shortcut.id);
            if value.is_empty() {
                debug!("Сброс {} к значению по умолчанию", shortcut.id);
            } else {
                debug!("Восстановление {} = '{}'", shortcut.id, value);
            }
            self.key_store.restore(shortcut, value);
        }

        self.block_state = BlockState::Unblocked;
        info!("Восстановлено {} сочетаний", self.config.shortcuts.len());
    }

    /// Цикл опроса до сигнала остановки. Если к моменту остановки сочетания
    /// отключены, они восстанавливаются перед выходом.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let period = Duration::from_millis(self.config.polling.interval_ms);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("ShortcutController запущен, интервал опроса {}мс", self.config.polling.interval_ms);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        self.shutdown();
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.block_state == BlockState::Blocked {
            info!("Остановка во время блокировки - возвращаем сочетания");
            self.restore_all();
        }
        info!("ShortcutController завершил работу");
    }
}
