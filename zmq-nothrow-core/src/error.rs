//! zmq-nothrow error types
//!
//! Failures come in two tiers that are never mixed:
//!
//! - [`ZmqError`]: runtime failures reported by the native engine (address
//!   in use, would block, context terminated, ...). Returned as `Err`.
//! - [`ContractViolation`]: misuse of the API (using an object before
//!   `init()`, initializing twice, ...). Raised as a panic.

use std::io;
use thiserror::Error;

use crate::options::{SocketOption, ValueKind};

/// Base value for libzmq's own errno numbers.
pub const ZMQ_HAUSNUMERO: i32 = 156_384_712;

/// Operation cannot be accomplished in the current socket state.
pub const EFSM: i32 = ZMQ_HAUSNUMERO + 51;

/// The protocol is not compatible with the socket type.
pub const ENOCOMPATPROTO: i32 = ZMQ_HAUSNUMERO + 52;

/// The context associated with the socket was terminated.
pub const ETERM: i32 = ZMQ_HAUSNUMERO + 53;

/// No I/O thread is available to accomplish the task.
pub const EMTHREAD: i32 = ZMQ_HAUSNUMERO + 54;

/// Runtime failure of a native call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZmqError {
    /// The native engine returned a failure status
    #[error("{message} (errno {errno})")]
    Native { errno: i32, message: String },

    /// Endpoint address could not be handed to C (interior NUL byte)
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    /// A raw socket type value not known to this binding
    #[error("Unknown socket type: {0}")]
    UnknownSocketType(i32),

    /// A typed option value whose C type does not match the option
    #[error("Option {option:?} takes {expected:?}, got {found:?}")]
    OptionKindMismatch {
        option: SocketOption,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Result type alias for native operations
pub type Result<T> = std::result::Result<T, ZmqError>;

impl ZmqError {
    /// Create a native error from an errno value and its description
    pub fn native(errno: i32, message: impl Into<String>) -> Self {
        Self::Native {
            errno,
            message: message.into(),
        }
    }

    /// The native errno, if this error came from the engine.
    #[must_use]
    pub const fn errno(&self) -> Option<i32> {
        match self {
            Self::Native { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    fn io_kind(&self) -> Option<io::ErrorKind> {
        match self.errno() {
            Some(errno) if errno < ZMQ_HAUSNUMERO => {
                Some(io::Error::from_raw_os_error(errno).kind())
            }
            _ => None,
        }
    }

    /// Non-blocking operation could not complete right now (EAGAIN)
    #[must_use]
    pub fn is_again(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::WouldBlock)
    }

    /// Call was interrupted by a signal (EINTR)
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::Interrupted)
    }

    /// The owning context was terminated or shut down (ETERM)
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.errno(), Some(ETERM))
    }

    /// Check if retrying the same call may succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Native { .. } => self.is_again() || self.is_interrupted(),
            Self::InvalidAddress(_)
            | Self::UnknownSocketType(_)
            | Self::OptionKindMismatch { .. } => false,
        }
    }
}

/// Misuse of the binding's init-before-use discipline.
///
/// These are programming errors, not runtime conditions: they are reported
/// through [`ContractViolation::raise`], which panics.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    /// Context operation before a successful `init()`
    #[error("context used before init()")]
    ContextNotInitialized,

    /// Second `init()` on a context that already holds a handle
    #[error("context init() called twice")]
    ContextAlreadyInitialized,

    /// Socket operation before a successful `init()`
    #[error("socket used before init()")]
    SocketNotInitialized,

    /// Second `init()` on a socket that already holds a handle
    #[error("socket init() called twice")]
    SocketAlreadyInitialized,

    /// Message operation before a successful `init*()`
    #[error("message used before init()")]
    MessageNotInitialized,

    /// `init*()` on a live message; `rebuild*()` replaces content
    #[error("message init() called on a live message, use rebuild()")]
    MessageAlreadyInitialized,

    /// Mutable access to content the message does not own exclusively:
    /// caller data from `init_data`, content shared by `copy_from`, or a
    /// received buffer
    #[error("message content is read-only, use rebuild_size() for a writable buffer")]
    MessageReadOnly,

    /// Releasing a native handle failed during drop
    #[error("{what} teardown failed (errno {errno})")]
    TeardownFailed { what: &'static str, errno: i32 },
}

impl ContractViolation {
    /// Report the violation and abort the current operation.
    #[cold]
    #[track_caller]
    pub fn raise(self) -> ! {
        let location = std::panic::Location::caller();
        tracing::error!(violation = %self, %location, "zmq-nothrow contract violated");
        panic!("{self}");
    }

    /// Report a teardown failure from a `Drop` impl.
    ///
    /// Panics like [`raise`](Self::raise), except while the thread is
    /// already unwinding, where a second panic would abort the process; the
    /// failure is only logged then.
    #[track_caller]
    pub fn raise_in_drop(self) {
        if std::thread::panicking() {
            tracing::error!(violation = %self, "zmq-nothrow teardown failed while unwinding");
        } else {
            self.raise();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_classification() {
        let eterm = ZmqError::native(ETERM, "Context was terminated");
        assert!(eterm.is_terminated());
        assert!(!eterm.is_again());
        assert!(!eterm.is_recoverable());

        let invalid = ZmqError::InvalidAddress("tcp://\0".into());
        assert_eq!(invalid.errno(), None);
        assert!(!invalid.is_recoverable());

        let mismatch = ZmqError::OptionKindMismatch {
            option: SocketOption::Linger,
            expected: ValueKind::Int,
            found: ValueKind::Bytes,
        };
        assert_eq!(mismatch.errno(), None);
        assert!(!mismatch.is_recoverable());
        assert_eq!(mismatch.to_string(), "Option Linger takes Int, got Bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_eagain_is_recoverable() {
        let again = ZmqError::native(11, "Resource temporarily unavailable");
        // EAGAIN is 11 on Linux and 35 on the BSDs
        if cfg!(target_os = "linux") {
            assert!(again.is_again());
            assert!(again.is_recoverable());
        }
    }

    #[test]
    fn test_display() {
        let err = ZmqError::native(ETERM, "Context was terminated");
        assert_eq!(
            err.to_string(),
            format!("Context was terminated (errno {ETERM})")
        );
        assert_eq!(
            ContractViolation::MessageNotInitialized.to_string(),
            "message used before init()"
        );
        assert_eq!(
            ContractViolation::MessageReadOnly.to_string(),
            "message content is read-only, use rebuild_size() for a writable buffer"
        );
    }

    #[test]
    #[should_panic(expected = "socket used before init()")]
    fn test_raise_panics() {
        ContractViolation::SocketNotInitialized.raise();
    }
}
