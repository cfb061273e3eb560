//! Logical input commands.
//!
//! The simulation never sees keys, only which [`Command`]s are active this
//! frame. Mapping keys (or gamepads, or a script) to commands is the caller's
//! business.

use serde::{Deserialize, Serialize};

/// A logical command the player can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    RotateLeft,
    RotateRight,
    RotateUp,
    RotateDown,
    RollLeft,
    RollRight,
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Interact,
}

impl Command {
    pub const ALL: [Command; 13] = [
        Command::RotateLeft,
        Command::RotateRight,
        Command::RotateUp,
        Command::RotateDown,
        Command::RollLeft,
        Command::RollRight,
        Command::MoveForward,
        Command::MoveBack,
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveUp,
        Command::MoveDown,
        Command::Interact,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Snapshot of the commands active during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputSnapshot {
    bits: u16,
}

impl InputSnapshot {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, command: Command) -> Self {
        self.press(command);
        self
    }

    pub fn press(&mut self, command: Command) {
        self.bits |= command.bit();
    }

    pub fn release(&mut self, command: Command) {
        self.bits &= !command.bit();
    }

    pub fn is_active(&self, command: Command) -> bool {
        self.bits & command.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Active commands in declaration order.
    pub fn active(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| self.is_active(*c))
    }
}

impl FromIterator<Command> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut snapshot = Self::none();
        for command in iter {
            snapshot.press(command);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut input = InputSnapshot::none();
        assert!(input.is_empty());
        input.press(Command::MoveForward);
        input.press(Command::Interact);
        assert!(input.is_active(Command::MoveForward));
        assert!(input.is_active(Command::Interact));
        assert!(!input.is_active(Command::MoveBack));
        input.release(Command::MoveForward);
        assert!(!input.is_active(Command::MoveForward));
    }

    #[test]
    fn collect_and_iterate() {
        let input: InputSnapshot = [Command::RollRight, Command::RotateLeft].into_iter().collect();
        let active: Vec<_> = input.active().collect();
        assert_eq!(active, vec![Command::RotateLeft, Command::RollRight]);
    }

    #[test]
    fn every_command_has_distinct_bit() {
        let all: InputSnapshot = Command::ALL.into_iter().collect();
        assert_eq!(all.active().count(), Command::ALL.len());
    }
}
