use std::fmt;

/// Смена фокуса целевого приложения между двумя опросами
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTransition {
    /// Приложение вышло на передний план: сочетания нужно отключить
    Gained,
    /// Приложение потеряло фокус: сочетания нужно вернуть
    Lost,
}

impl FocusTransition {
    pub fn from_focus(focused: bool) -> Self {
        if focused {
            FocusTransition::Gained
        } else {
            FocusTransition::Lost
        }
    }
}

impl fmt::Display for FocusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FocusTransition::Gained => write!(f, "фокус получен"),
            FocusTransition::Lost => write!(f, "фокус потерян"),
        }
    }
}

/// Событие смены фокуса
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEvent {
    pub transition: FocusTransition,
    pub timestamp: std::time::Instant,
}

impl FocusEvent {
    pub fn new(transition: FocusTransition) -> Self {
        Self {
            transition,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for FocusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}ms ago)",
            self.transition,
            self.timestamp.elapsed().as_millis()
        )
    }
}
