//! # zmq-nothrow
//!
//! Owning wrappers over the libzmq C API that never panic on runtime
//! failure.
//!
//! ## Model
//!
//! Every native resource is a move-only value with construction split from
//! initialization:
//!
//! - [`Context`]: `new()` then `init(io_threads)`
//! - [`Socket`]: `new()` then `init(&context, kind)`
//! - [`Message`]: `new()` then `init()` / `init_size(n)` / `init_data(buf)`
//!
//! Failures come in two tiers:
//!
//! - **Runtime failures** (address in use, would block, context terminated)
//!   are returned as [`ZmqError`] carrying the native errno.
//! - **Contract violations** (use before `init`, double `init`) panic with a
//!   [`ContractViolation`]; they are programming errors.
//!
//! Drop releases the native resource exactly once. A socket borrows its
//! context, so the context always outlives it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zmq_nothrow::prelude::*;
//!
//! # fn example() -> Result<(), ZmqError> {
//! let mut ctx = Context::new();
//! ctx.init(1)?;
//!
//! let mut server = Socket::new();
//! server.init(&ctx, SocketType::Rep)?;
//! server.bind("inproc://echo")?;
//!
//! let mut client = Socket::new();
//! client.init(&ctx, SocketType::Req)?;
//! client.connect("inproc://echo")?;
//!
//! let mut request = Message::new();
//! request.init_from_slice(b"Hello")?;
//! client.send(&mut request, MsgFlags::NONE)?;
//!
//! let mut received = Message::new();
//! received.init()?;
//! server.recv(&mut received, MsgFlags::NONE)?;
//! assert_eq!(received.data(), b"Hello");
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! - `unsafe` is confined to the FFI calls in this crate; each call states
//!   the invariant it relies on
//! - `zmq-nothrow-core` is `#![deny(unsafe_code)]`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod dev_tracing;
pub mod device;
pub mod message;
pub mod native;
pub mod poll;
pub mod socket;

// Re-export core types
pub use bytes::Bytes;
pub use context::Context;
pub use device::{device, proxy};
pub use message::Message;
pub use native::version;
pub use poll::{poll, PollItem};
pub use socket::Socket;
pub use zmq_nothrow_core::config::{ContextOption, ContextOptions};
pub use zmq_nothrow_core::device::DeviceKind;
pub use zmq_nothrow_core::error::{ContractViolation, Result, ZmqError};
pub use zmq_nothrow_core::flags::{MsgFlags, PollEvents};
pub use zmq_nothrow_core::options::{OptionValue, SocketOption, SocketOptions, ValueKind};
pub use zmq_nothrow_core::socket_type::SocketType;

/// Everything needed for typical use.
pub mod prelude {
    pub use crate::{
        device, poll, proxy, Context, ContextOptions, DeviceKind, Message, MsgFlags, PollEvents,
        PollItem, Socket, SocketOption, SocketOptions, SocketType, ZmqError,
    };
}
