use serde::Serialize;

use super::navigation::Direction;

/// Команда, в которую превращается нажатие клавиши.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    Move(Direction),
    /// Enter / Space: выбрать или снять место под фокусом.
    Activate,
    /// Escape: снять фокус.
    ClearFocus,
}

impl KeyCommand {
    /// Имена клавиш как в `KeyboardEvent.key`. Прочие клавиши игнорируются.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(KeyCommand::Move(Direction::Left)),
            "ArrowRight" => Some(KeyCommand::Move(Direction::Right)),
            "ArrowUp" => Some(KeyCommand::Move(Direction::Up)),
            "ArrowDown" => Some(KeyCommand::Move(Direction::Down)),
            "Enter" | " " | "Space" | "Spacebar" => Some(KeyCommand::Activate),
            "Escape" | "Esc" => Some(KeyCommand::ClearFocus),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KeyHelp {
    pub keys: &'static str,
    pub action: &'static str,
}

pub const KEY_HELP: &[KeyHelp] = &[
    KeyHelp { keys: "Arrow Keys", action: "Navigate between seats" },
    KeyHelp { keys: "Enter/Space", action: "Select/deselect seat" },
    KeyHelp { keys: "Escape", action: "Clear focus" },
];
