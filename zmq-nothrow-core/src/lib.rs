//! zmq-nothrow Core
//!
//! FFI-free building blocks shared by the `zmq-nothrow` binding:
//! - Error tiers: runtime failures and contract violations (`error`)
//! - Socket types (`socket_type`)
//! - Send/recv and poll flags (`flags`)
//! - Socket option ids, values and the options builder (`options`)
//! - Context options (`config`)
//! - Device kinds (`device`)

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
pub mod config;
pub mod device;
pub mod error;
pub mod flags;
pub mod options;
pub mod socket_type;

// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::config::{ContextOption, ContextOptions};
    pub use crate::device::DeviceKind;
    pub use crate::error::{ContractViolation, Result, ZmqError};
    pub use crate::flags::{MsgFlags, PollEvents};
    pub use crate::options::{OptionValue, SocketOption, SocketOptions};
    pub use crate::socket_type::SocketType;
}
