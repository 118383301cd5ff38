use tracing::info;

use super::r#trait::FocusTrackerTrait;

/// 20 опросов по 500мс, то есть смена фокуса раз в 10 секунд
pub const DEFAULT_TOGGLE_EVERY: u32 = 20;

/// Эмуляция: фокус переключается каждые `toggle_every` опросов.
/// Позволяет проверить цикл блокировки без запуска целевого приложения.
pub struct SimulatedFocusTracker {
    toggle_every: u32,
    polls: u32,
    focused: bool,
}

impl SimulatedFocusTracker {
    pub fn new(toggle_every: u32) -> Self {
        info!("Эмуляция фокуса - целевое приложение 'получает' фокус каждые {} опросов", toggle_every);
        Self {
            toggle_every: toggle_every.max(1),
            polls: 0,
            focused: false,
        }
    }
}

#[async_trait::async_trait]
impl FocusTrackerTrait for SimulatedFocusTracker {
    async fn is_target_focused(&mut self) -> bool {
        self.polls += 1;
        if self.polls >= self.toggle_every {
            self.polls = 0;
            self.focused = !self.focused;
            info!("Эмуляция: фокус целевого приложения = {}", self.focused);
        }
        self.focused
    }
}
