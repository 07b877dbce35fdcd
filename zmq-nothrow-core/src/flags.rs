//! Bit flags passed through to send/recv and poll.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flags for `send`/`recv` (`zmq_msg_send` / `zmq_msg_recv`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MsgFlags(i32);

impl MsgFlags {
    /// Blocking operation, single-part
    pub const NONE: Self = Self(0);
    /// ZMQ_DONTWAIT: fail with EAGAIN instead of blocking
    pub const DONTWAIT: Self = Self(1);
    /// ZMQ_SNDMORE: more frames of the same message follow
    pub const SNDMORE: Self = Self(2);

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MsgFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MsgFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MsgFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::DONTWAIT) {
            names.push("DONTWAIT");
        }
        if self.contains(Self::SNDMORE) {
            names.push("SNDMORE");
        }
        if names.is_empty() {
            names.push("NONE");
        }
        write!(f, "MsgFlags({})", names.join(" | "))
    }
}

/// Poll event mask (`events` / `revents` of `zmq_pollitem_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PollEvents(i16);

impl PollEvents {
    pub const EMPTY: Self = Self(0);
    /// ZMQ_POLLIN: at least one message can be received without blocking
    pub const POLLIN: Self = Self(1);
    /// ZMQ_POLLOUT: at least one message can be sent without blocking
    pub const POLLOUT: Self = Self(2);
    /// ZMQ_POLLERR: error condition on a raw file descriptor
    pub const POLLERR: Self = Self(4);
    /// ZMQ_POLLPRI: urgent data on a raw file descriptor
    pub const POLLPRI: Self = Self(8);

    #[must_use]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_raw(self) -> i16 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for PollEvents {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PollEvents {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_flags_combine() {
        let flags = MsgFlags::DONTWAIT | MsgFlags::SNDMORE;
        assert_eq!(flags.as_raw(), 3);
        assert!(flags.contains(MsgFlags::SNDMORE));
        assert!(!MsgFlags::NONE.contains(MsgFlags::DONTWAIT));
        assert_eq!(format!("{flags:?}"), "MsgFlags(DONTWAIT | SNDMORE)");
        assert_eq!(format!("{:?}", MsgFlags::default()), "MsgFlags(NONE)");
    }

    #[test]
    fn test_poll_events() {
        let mut events = PollEvents::POLLIN;
        events |= PollEvents::POLLOUT;
        assert_eq!(events.as_raw(), 3);
        assert!(events.contains(PollEvents::POLLIN));
        assert!(!events.contains(PollEvents::POLLERR));
        assert!(PollEvents::EMPTY.is_empty());
    }
}
