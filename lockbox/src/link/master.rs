// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master side of the link: poll every servant in turn and OR their replies.
//!
//! A reply is only as fresh as the servant's previous exchange, because that is when the servant
//! preloaded it. After the master switches commands (say from `Acknowledge` back to `Hold`) the
//! first reply from each servant still describes the state from before the switch. [`Poll::fresh`]
//! is set only when every servant's previous exchange carried the same command as this one.

use crate::config::LinkConfig;
use crate::link::{Command, Transfer};
use crate::status::StatusByte;
use crate::LinkError;

/// Outcome of one [`MasterLink::broadcast`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Poll {
    pub command: Command,
    /// OR of every servant's reply; failed servants count as [`StatusByte::BLOCKED`].
    pub aggregate: StatusByte,
    /// Every reply was captured after the servant had already seen `command`.
    pub fresh: bool,
    /// Bit `i` set if the exchange with servant `i` failed.
    pub failed: u8,
    /// Most recent failure in this poll.
    pub last_error: Option<LinkError>,
}

impl Poll {
    /// The poll proves every servant satisfied.
    #[inline]
    pub fn all_clear(&self) -> bool {
        self.fresh && self.aggregate.is_clear()
    }
}

/// Blocking poller for `N` servants behind one [`Transfer`].
pub struct MasterLink<T, const N: usize> {
    transfer: T,
    config: LinkConfig,
    replies: [StatusByte; N],
    last_sent: [Option<Command>; N],
    failures: u32,
}

impl<T: Transfer, const N: usize> MasterLink<T, N> {
    pub fn new(transfer: T, config: LinkConfig) -> Self {
        Self {
            transfer,
            config,
            replies: [StatusByte::BLOCKED; N],
            last_sent: [None; N],
            failures: 0,
        }
    }

    /// Exchange `command` with a single servant and record its reply.
    pub fn exchange(&mut self, servant: usize, command: Command) -> Result<StatusByte, LinkError> {
        if servant >= N {
            return Err(LinkError::NoSuchServant { servant });
        }

        match self
            .transfer
            .exchange(servant, command.to_byte(), self.config.timeout)
        {
            Ok(reply) => {
                let status = StatusByte::from_bits(reply);
                self.replies[servant] = status;
                self.last_sent[servant] = Some(command);
                Ok(status)
            }
            Err(e) => {
                // The servant may or may not have seen the command; distrust its next reply too.
                self.replies[servant] = StatusByte::BLOCKED;
                self.last_sent[servant] = None;
                self.failures = self.failures.wrapping_add(1);
                Err(e)
            }
        }
    }

    /// Send `command` to every servant, one after the other, and aggregate the replies.
    pub fn broadcast(&mut self, command: Command) -> Poll {
        let mut fresh = true;
        let mut failed = 0u8;
        let mut last_error = None;

        for servant in 0..N {
            let primed = self.last_sent[servant] == Some(command);
            match self.exchange(servant, command) {
                Ok(_) => fresh &= primed,
                Err(e) => {
                    fresh = false;
                    if servant < 8 {
                        failed |= 1 << servant;
                    }
                    last_error = Some(e);
                }
            }
        }

        Poll {
            command,
            aggregate: self.aggregate(),
            fresh,
            failed,
            last_error,
        }
    }

    /// OR of the last reply from every servant.
    pub fn aggregate(&self) -> StatusByte {
        self.replies
            .iter()
            .fold(StatusByte::CLEAR, |acc, &reply| acc | reply)
    }

    /// Last reply recorded for `servant`.
    pub fn reply(&self, servant: usize) -> Option<StatusByte> {
        self.replies.get(servant).copied()
    }

    /// Failed exchanges since boot.
    #[inline]
    pub fn failures(&self) -> u32 {
        self.failures
    }

    #[inline]
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    #[inline]
    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    pub fn free(self) -> T {
        self.transfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Timeout;
    use std::vec::Vec;

    /// Replies from a fixed table; records every exchange.
    struct Scripted {
        replies: [u8; 2],
        silent: Option<usize>,
        log: Vec<(usize, u8, Timeout)>,
    }

    impl Transfer for Scripted {
        fn exchange(&mut self, servant: usize, byte: u8, timeout: Timeout) -> Result<u8, LinkError> {
            self.log.push((servant, byte, timeout));
            if self.silent == Some(servant) {
                return Err(LinkError::Timeout { servant });
            }
            Ok(self.replies[servant])
        }
    }

    fn link(replies: [u8; 2]) -> MasterLink<Scripted, 2> {
        MasterLink::new(
            Scripted {
                replies,
                silent: None,
                log: Vec::new(),
            },
            LinkConfig::default(),
        )
    }

    #[test]
    fn replies_start_blocked() {
        let link = link([0, 0]);
        assert_eq!(link.aggregate(), StatusByte::BLOCKED);
    }

    #[test]
    fn broadcast_visits_servants_in_order_and_ors_replies() {
        let mut link = link([0x01, 0x04]);
        let poll = link.broadcast(Command::Hold);

        assert_eq!(poll.aggregate.bits(), 0x05);
        let sent: Vec<_> = link.transfer_mut().log.iter().map(|e| (e.0, e.1)).collect();
        assert_eq!(sent, [(0, 0x01), (1, 0x01)]);
        assert!(link
            .transfer_mut()
            .log
            .iter()
            .all(|e| e.2 == LinkConfig::default().timeout));
    }

    #[test]
    fn first_poll_after_command_change_is_stale() {
        let mut link = link([0, 0]);

        let first = link.broadcast(Command::Hold);
        assert!(first.aggregate.is_clear());
        assert!(!first.fresh);
        assert!(!first.all_clear());

        assert!(link.broadcast(Command::Hold).all_clear());

        assert!(!link.broadcast(Command::Acknowledge).fresh);
        assert!(!link.broadcast(Command::Hold).fresh);
        assert!(link.broadcast(Command::Hold).fresh);
    }

    #[test]
    fn silent_servant_blocks_the_aggregate() {
        let mut link = link([0, 0]);
        link.broadcast(Command::Hold);
        link.transfer_mut().silent = Some(1);

        let poll = link.broadcast(Command::Hold);
        assert_eq!(poll.aggregate, StatusByte::BLOCKED);
        assert!(!poll.fresh);
        assert_eq!(poll.failed, 0b10);
        assert_eq!(poll.last_error, Some(LinkError::Timeout { servant: 1 }));
        assert_eq!(link.failures(), 1);

        // Recovered, but the first reply after a failure is not trusted.
        link.transfer_mut().silent = None;
        assert!(!link.broadcast(Command::Hold).fresh);
        assert!(link.broadcast(Command::Hold).all_clear());
    }

    #[test]
    fn exchange_rejects_unknown_servant() {
        let mut link = link([0, 0]);
        assert_eq!(
            link.exchange(2, Command::Hold),
            Err(LinkError::NoSuchServant { servant: 2 })
        );
        assert!(link.transfer_mut().log.is_empty());
    }
}
