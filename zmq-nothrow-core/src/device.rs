//! Built-in device kinds.

use std::fmt;

/// Device kind passed to `device()`.
///
/// Since libzmq 3 every kind is served by the same bidirectional proxy, so
/// the kind only documents the intended wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DeviceKind {
    /// PULL frontend, PUSH backend
    Streamer = 1,
    /// SUB frontend, PUB backend
    Forwarder = 2,
    /// ROUTER frontend, DEALER backend
    Queue = 3,
}

impl DeviceKind {
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Streamer => "STREAMER",
            Self::Forwarder => "FORWARDER",
            Self::Queue => "QUEUE",
        })
    }
}
