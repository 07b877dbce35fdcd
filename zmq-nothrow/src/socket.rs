//! Owning wrapper over a libzmq socket.

use std::ffi::CString;
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_void;
use std::ptr::NonNull;

use bytes::Bytes;
use zmq_nothrow_core::error::{ContractViolation, Result, ZmqError};
use zmq_nothrow_core::flags::{MsgFlags, PollEvents};
use zmq_nothrow_core::options::{OptionValue, SocketOption, SocketOptions};
use zmq_nothrow_core::socket_type::SocketType;

use crate::context::Context;
use crate::message::{Access, Message};
use crate::native;
use crate::poll::PollItem;

/// Buffer for ZMQ_LAST_ENDPOINT. libzmq rejects a short buffer with EINVAL
/// instead of reporting the needed length.
const MAX_ENDPOINT_LEN: usize = 1024;

/// One communication endpoint created from a [`Context`].
///
/// The `'ctx` borrow keeps the context alive for as long as the socket is.
/// All operations take `&self`; the socket is `Send` but not `Sync`, so
/// calls on one socket are always serialized.
pub struct Socket<'ctx> {
    handle: Option<NonNull<c_void>>,
    kind: Option<SocketType>,
    _context: PhantomData<&'ctx Context>,
}

// SAFETY: libzmq sockets may migrate between threads as long as they are
// not used concurrently, which !Sync guarantees.
unsafe impl Send for Socket<'_> {}

impl<'ctx> Socket<'ctx> {
    /// An uninitialized socket. Acquires nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handle: None,
            kind: None,
            _context: PhantomData,
        }
    }

    /// Whether a native socket is held.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Create a native socket of `kind` on `context`.
    ///
    /// # Panics
    ///
    /// If the socket is already initialized or `context` is not.
    pub fn init(&mut self, context: &'ctx Context, kind: SocketType) -> Result<()> {
        if self.handle.is_some() {
            ContractViolation::SocketAlreadyInitialized.raise();
        }
        let ctx = context.as_raw();

        // SAFETY: ctx is a live context, kept alive by the 'ctx borrow.
        let raw = unsafe { zmq_sys::zmq_socket(ctx, kind.as_raw()) };
        let handle = NonNull::new(raw).ok_or_else(native::last_error)?;

        tracing::debug!(socket = %kind, "socket initialized");
        self.handle = Some(handle);
        self.kind = Some(kind);
        Ok(())
    }

    /// The raw `void *` socket for direct libzmq calls.
    ///
    /// # Panics
    ///
    /// If the socket is not initialized.
    #[must_use]
    #[track_caller]
    pub fn as_raw(&self) -> *mut c_void {
        match self.handle {
            Some(handle) => handle.as_ptr(),
            None => ContractViolation::SocketNotInitialized.raise(),
        }
    }

    /// Set an option from its raw id and value buffer (`zmq_setsockopt`).
    pub fn setsockopt(&self, option: i32, value: &[u8]) -> Result<()> {
        let socket = self.as_raw();
        // SAFETY: value is valid for value.len() bytes; socket is live.
        let rc = unsafe {
            zmq_sys::zmq_setsockopt(socket, option, value.as_ptr().cast::<c_void>(), value.len())
        };
        native::check(rc)?;
        Ok(())
    }

    /// Read an option into `buf` (`zmq_getsockopt`), returning the length
    /// libzmq wrote.
    pub fn getsockopt(&self, option: i32, buf: &mut [u8]) -> Result<usize> {
        let socket = self.as_raw();
        let mut len = buf.len();
        // SAFETY: buf is writable for len bytes; len is updated in place.
        let rc = unsafe {
            zmq_sys::zmq_getsockopt(socket, option, buf.as_mut_ptr().cast::<c_void>(), &mut len)
        };
        native::check(rc)?;
        Ok(len)
    }

    /// Set a typed option.
    ///
    /// A value whose C type differs from the option's is rejected with
    /// [`ZmqError::OptionKindMismatch`] before reaching libzmq.
    pub fn set_option(&self, option: SocketOption, value: &OptionValue) -> Result<()> {
        let expected = option.value_kind();
        if value.kind() != expected {
            return Err(ZmqError::OptionKindMismatch {
                option,
                expected,
                found: value.kind(),
            });
        }
        self.setsockopt(option.as_raw(), &value.as_bytes())
    }

    /// Read an `int` option.
    pub fn get_int(&self, option: SocketOption) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.getsockopt(option.as_raw(), &mut buf)?;
        Ok(i32::from_ne_bytes(buf))
    }

    /// Read an `int64_t` option.
    pub fn get_int64(&self, option: SocketOption) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.getsockopt(option.as_raw(), &mut buf)?;
        Ok(i64::from_ne_bytes(buf))
    }

    /// Read a binary option of at most `capacity` bytes.
    pub fn get_bytes(&self, option: SocketOption, capacity: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; capacity];
        let len = self.getsockopt(option.as_raw(), &mut buf)?;
        buf.truncate(len);
        Ok(buf)
    }

    /// Apply every setting in `options`, stopping at the first failure.
    pub fn apply_options(&self, options: &SocketOptions) -> Result<()> {
        let settings = options.settings();
        for (option, value) in &settings {
            self.set_option(*option, value).map_err(|err| {
                tracing::debug!(?option, %err, "socket option rejected");
                err
            })?;
        }
        tracing::debug!(socket = %self.kind_name(), count = settings.len(), "socket options applied");
        Ok(())
    }

    /// Socket type as reported by the engine (ZMQ_TYPE).
    pub fn socket_type(&self) -> Result<SocketType> {
        SocketType::try_from(self.get_int(SocketOption::Type)?)
    }

    /// Whether the last received frame has more frames following (ZMQ_RCVMORE).
    pub fn has_more(&self) -> Result<bool> {
        Ok(self.get_int(SocketOption::RcvMore)? != 0)
    }

    /// Last endpoint bound, with wildcards resolved (ZMQ_LAST_ENDPOINT).
    pub fn last_endpoint(&self) -> Result<String> {
        let mut raw = self.get_bytes(SocketOption::LastEndpoint, MAX_ENDPOINT_LEN)?;
        while raw.last() == Some(&0) {
            raw.pop();
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Subscribe a SUB socket to a prefix; empty subscribes to everything.
    pub fn subscribe(&self, prefix: &[u8]) -> Result<()> {
        self.setsockopt(SocketOption::Subscribe.as_raw(), prefix)
    }

    /// Remove a previous subscription.
    pub fn unsubscribe(&self, prefix: &[u8]) -> Result<()> {
        self.setsockopt(SocketOption::Unsubscribe.as_raw(), prefix)
    }

    /// Accept connections on `address`.
    pub fn bind(&self, address: &str) -> Result<()> {
        let socket = self.as_raw();
        let endpoint = endpoint(address)?;
        // SAFETY: socket is live, endpoint is NUL-terminated.
        native::check(unsafe { zmq_sys::zmq_bind(socket, endpoint.as_ptr()) })?;
        tracing::debug!(socket = %self.kind_name(), address, "bound");
        Ok(())
    }

    /// Connect toward `address`.
    pub fn connect(&self, address: &str) -> Result<()> {
        let socket = self.as_raw();
        let endpoint = endpoint(address)?;
        // SAFETY: socket is live, endpoint is NUL-terminated.
        native::check(unsafe { zmq_sys::zmq_connect(socket, endpoint.as_ptr()) })?;
        tracing::debug!(socket = %self.kind_name(), address, "connected");
        Ok(())
    }

    /// Stop accepting connections on `address`.
    pub fn unbind(&self, address: &str) -> Result<()> {
        let socket = self.as_raw();
        let endpoint = endpoint(address)?;
        // SAFETY: socket is live, endpoint is NUL-terminated.
        native::check(unsafe { zmq_sys::zmq_unbind(socket, endpoint.as_ptr()) })?;
        tracing::debug!(socket = %self.kind_name(), address, "unbound");
        Ok(())
    }

    /// Drop the connection toward `address`.
    pub fn disconnect(&self, address: &str) -> Result<()> {
        let socket = self.as_raw();
        let endpoint = endpoint(address)?;
        // SAFETY: socket is live, endpoint is NUL-terminated.
        native::check(unsafe { zmq_sys::zmq_disconnect(socket, endpoint.as_ptr()) })?;
        tracing::debug!(socket = %self.kind_name(), address, "disconnected");
        Ok(())
    }

    /// Queue `msg` for transmission, returning its size in bytes.
    ///
    /// On success libzmq owns the content and `msg` is left as a live empty,
    /// writable message.
    ///
    /// # Panics
    ///
    /// If the socket or `msg` is not initialized.
    pub fn send(&self, msg: &mut Message, flags: MsgFlags) -> Result<usize> {
        let socket = self.as_raw();
        let raw = msg.raw_mut();
        // SAFETY: socket and raw are live.
        let sent = native::check(unsafe { zmq_sys::zmq_msg_send(raw, socket, flags.as_raw()) })?;
        msg.set_access(Access::Exclusive);
        tracing::trace!(socket = %self.kind_name(), bytes = sent, ?flags, "sent");
        Ok(sent as usize)
    }

    /// Receive into `msg`, overwriting its content, returning the size.
    ///
    /// The received content may share the sender's buffer (inproc), so `msg`
    /// is read-only until rebuilt.
    ///
    /// # Panics
    ///
    /// If the socket or `msg` is not initialized.
    pub fn recv(&self, msg: &mut Message, flags: MsgFlags) -> Result<usize> {
        let socket = self.as_raw();
        let raw = msg.raw_mut();
        // SAFETY: socket and raw are live.
        let received =
            native::check(unsafe { zmq_sys::zmq_msg_recv(raw, socket, flags.as_raw()) })?;
        msg.set_access(Access::ReadOnly);
        tracing::trace!(socket = %self.kind_name(), bytes = received, ?flags, "received");
        Ok(received as usize)
    }

    /// Send a copy of `data` as one frame.
    pub fn send_bytes(&self, data: &[u8], flags: MsgFlags) -> Result<usize> {
        let mut msg = Message::new();
        msg.init_from_slice(data)?;
        self.send(&mut msg, flags)
    }

    /// Receive one frame.
    pub fn recv_bytes(&self, flags: MsgFlags) -> Result<Bytes> {
        let mut msg = Message::new();
        msg.init()?;
        self.recv(&mut msg, flags)?;
        Ok(Bytes::copy_from_slice(msg.data()))
    }

    /// Send every frame of a multipart message. `SNDMORE` is added to all
    /// but the last frame; an empty iterator sends nothing.
    pub fn send_multipart<I, T>(&self, frames: I, flags: MsgFlags) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut frames = frames.into_iter().peekable();
        while let Some(frame) = frames.next() {
            let frame_flags = if frames.peek().is_some() {
                flags | MsgFlags::SNDMORE
            } else {
                flags
            };
            self.send_bytes(frame.as_ref(), frame_flags)?;
        }
        Ok(())
    }

    /// Receive every frame of the next multipart message.
    pub fn recv_multipart(&self, flags: MsgFlags) -> Result<Vec<Bytes>> {
        let mut frames = Vec::new();
        let mut msg = Message::new();
        msg.init()?;
        loop {
            self.recv(&mut msg, flags)?;
            frames.push(Bytes::copy_from_slice(msg.data()));
            if !msg.more() {
                return Ok(frames);
            }
        }
    }

    /// A poll entry watching this socket for `events`.
    #[must_use]
    pub fn as_poll_item(&self, events: PollEvents) -> PollItem<'_> {
        PollItem::from_socket(self, events)
    }

    fn kind_name(&self) -> &'static str {
        self.kind.map_or("UNINITIALIZED", |kind| kind.as_str())
    }
}

fn endpoint(address: &str) -> Result<CString> {
    CString::new(address).map_err(|_| ZmqError::InvalidAddress(address.to_owned()))
}

impl Default for Socket<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Socket<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("initialized", &self.is_initialized())
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Socket<'_> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        // SAFETY: handle came from zmq_socket and is closed exactly once.
        let rc = unsafe { zmq_sys::zmq_close(handle.as_ptr()) };
        if rc == 0 {
            tracing::debug!(socket = %self.kind_name(), "socket closed");
            return;
        }

        let err = native::last_error();
        ContractViolation::TeardownFailed {
            what: "socket",
            errno: err.errno().unwrap_or(-1),
        }
        .raise_in_drop();
    }
}
