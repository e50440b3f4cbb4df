// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command bytes sent from the master to every servant.

// Command bytes
pub const MSG_HOLD: u8 = 0x01;
pub const MSG_PROCEED: u8 = 0x02;
pub const MSG_ACKNOWLEDGE: u8 = 0x80;

/// Master-to-servant command. Any other byte on the wire is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Door is locked; servants keep verifying.
    Hold,
    /// Aggregate was clear and the door is unlocking.
    Proceed,
    /// Door cycle finished; latched conditions reset.
    Acknowledge,
}

impl Command {
    pub const fn from_byte(byte: u8) -> Option<Command> {
        match byte {
            MSG_HOLD => Some(Command::Hold),
            MSG_PROCEED => Some(Command::Proceed),
            MSG_ACKNOWLEDGE => Some(Command::Acknowledge),
            _ => None,
        }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            Command::Hold => MSG_HOLD,
            Command::Proceed => MSG_PROCEED,
            Command::Acknowledge => MSG_ACKNOWLEDGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_three_bytes_are_commands() {
        let decoded = (0..=u8::MAX).filter(|&b| Command::from_byte(b).is_some()).count();
        assert_eq!(decoded, 3);
        for cmd in [Command::Hold, Command::Proceed, Command::Acknowledge] {
            assert_eq!(Command::from_byte(cmd.to_byte()), Some(cmd));
        }
    }
}
