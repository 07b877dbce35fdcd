//! Owning wrapper over an inline `zmq_msg_t`.
//!
//! A [`Message`] is either `Empty` (no native message constructed) or
//! `Live` (a native message that must eventually be closed). Every failed
//! `init*`/`rebuild*` leaves it `Empty`, ready for another `init*`.
//!
//! A live message also records whether it owns its content exclusively.
//! Only then does [`Message::data_mut`] hand out a mutable slice.

use std::fmt;
use std::os::raw::{c_int, c_void};
use std::slice;

use zmq_nothrow_core::error::{ContractViolation, Result};
use zmq_sys::zmq_msg_t;

use crate::native;

enum State {
    Empty,
    Live { msg: zmq_msg_t, access: Access },
}

/// Who may write the content of a live message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Buffer allocated by libzmq for this message alone.
    Exclusive,
    /// Caller data, content shared with another message, or a received
    /// buffer that may alias the sender's.
    ReadOnly,
}

/// A variable-length byte buffer exchanged over a [`Socket`](crate::Socket).
///
/// Not `Clone`: duplicate with [`copy_from`](Self::copy_from), transfer with
/// [`move_from`](Self::move_from).
///
/// Content is writable through [`data_mut`](Self::data_mut) only after
/// [`init`](Self::init), [`init_size`](Self::init_size) or their `rebuild`
/// counterparts. Messages wrapping caller data, sharing content after
/// [`copy_from`](Self::copy_from), or filled by a receive are read-only.
///
/// # Examples
///
/// ```rust,no_run
/// use zmq_nothrow::Message;
///
/// let mut msg = Message::new();
/// msg.init_from_slice(b"hello")?;
/// assert_eq!(msg.data(), b"hello");
///
/// msg.rebuild_size(16)?;
/// assert_eq!(msg.size(), 16);
/// # Ok::<(), zmq_nothrow::ZmqError>(())
/// ```
pub struct Message {
    state: State,
}

// SAFETY: a zmq_msg_t is plain data plus atomically refcounted content;
// caller data handed to init_data is required to be Send.
unsafe impl Send for Message {}

impl Message {
    /// An uninitialized message. Acquires nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: State::Empty }
    }

    /// Whether a native message is live.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        matches!(self.state, State::Live { .. })
    }

    /// Whether [`data_mut`](Self::data_mut) may be called.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(
            self.state,
            State::Live {
                access: Access::Exclusive,
                ..
            }
        )
    }

    /// Construct an empty native message.
    ///
    /// # Panics
    ///
    /// If the message is already initialized.
    pub fn init(&mut self) -> Result<()> {
        self.expect_empty();
        // SAFETY: msg points at a fresh zmq_msg_t.
        self.acquire(Access::Exclusive, |msg| unsafe { zmq_sys::zmq_msg_init(msg) })
    }

    /// Construct a native message of `size` zero-filled bytes.
    ///
    /// # Panics
    ///
    /// If the message is already initialized.
    pub fn init_size(&mut self, size: usize) -> Result<()> {
        self.expect_empty();
        // SAFETY: msg points at a fresh zmq_msg_t.
        self.acquire(Access::Exclusive, |msg| unsafe {
            zmq_sys::zmq_msg_init_size(msg, size)
        })?;
        self.data_mut().fill(0);
        Ok(())
    }

    /// Construct a native message that borrows `data` without copying.
    ///
    /// `data` is boxed and dropped by libzmq's deallocation callback once the
    /// last reference to the buffer is released, possibly on an I/O thread.
    /// The message is read-only: `data` may be immutable memory.
    ///
    /// # Panics
    ///
    /// If the message is already initialized.
    pub fn init_data<T>(&mut self, data: T) -> Result<()>
    where
        T: AsRef<[u8]> + Send + 'static,
    {
        self.expect_empty();

        let hint = Box::into_raw(Box::new(data));
        // SAFETY: hint is a valid, uniquely owned Box<T>; the heap value does
        // not move until release_boxed reclaims it.
        let bytes = unsafe { (*hint).as_ref() };
        let (ptr, len) = (bytes.as_ptr(), bytes.len());

        let result = self.acquire(Access::ReadOnly, |msg| {
            // SAFETY: ptr/len describe memory owned by hint, which libzmq
            // hands back to release_boxed exactly once.
            unsafe {
                zmq_sys::zmq_msg_init_data(
                    msg,
                    ptr.cast_mut().cast::<c_void>(),
                    len,
                    Some(release_boxed::<T>),
                    hint.cast::<c_void>(),
                )
            }
        });

        if result.is_err() {
            // libzmq never took ownership.
            // SAFETY: hint came from Box::into_raw above and was not released.
            drop(unsafe { Box::from_raw(hint) });
        }
        result
    }

    /// Construct a native message holding a copy of `bytes`.
    ///
    /// # Panics
    ///
    /// If the message is already initialized.
    pub fn init_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.init_size(bytes.len())?;
        self.data_mut().copy_from_slice(bytes);
        Ok(())
    }

    /// Close the live message and construct an empty one in its place.
    ///
    /// If closing fails its error is returned and nothing is re-acquired.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    pub fn rebuild(&mut self) -> Result<()> {
        self.release()?;
        self.init()
    }

    /// Close the live message and construct one of `size` zero-filled bytes.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    pub fn rebuild_size(&mut self, size: usize) -> Result<()> {
        self.release()?;
        self.init_size(size)
    }

    /// Close the live message and construct one borrowing `data`.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    pub fn rebuild_data<T>(&mut self, data: T) -> Result<()>
    where
        T: AsRef<[u8]> + Send + 'static,
    {
        self.release()?;
        self.init_data(data)
    }

    /// Take over the content of `source`, which becomes a live empty message.
    ///
    /// The content keeps its access: a read-only source yields a read-only
    /// destination.
    ///
    /// # Panics
    ///
    /// If either message is not initialized.
    pub fn move_from(&mut self, source: &mut Message) -> Result<()> {
        let dest = self.raw_mut();
        let src = source.raw_mut();
        // SAFETY: both point at distinct live messages (guaranteed by &mut).
        native::check(unsafe { zmq_sys::zmq_msg_move(dest, src) })?;
        let moved = source.access();
        self.set_access(moved);
        source.set_access(Access::Exclusive);
        Ok(())
    }

    /// Make this message refer to the same content as `source`.
    ///
    /// libzmq may share one refcounted buffer between the two, so both
    /// messages are read-only afterwards until rebuilt.
    ///
    /// # Panics
    ///
    /// If either message is not initialized.
    pub fn copy_from(&mut self, source: &mut Message) -> Result<()> {
        let dest = self.raw_mut();
        let src = source.raw_mut();
        // SAFETY: both point at distinct live messages.
        native::check(unsafe { zmq_sys::zmq_msg_copy(dest, src) })?;
        self.set_access(Access::ReadOnly);
        source.set_access(Access::ReadOnly);
        Ok(())
    }

    /// Message content.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    #[must_use]
    #[track_caller]
    pub fn data(&self) -> &[u8] {
        let msg = self.raw();
        // SAFETY: msg is live for the lifetime of &self; libzmq reports a
        // buffer of `size` bytes at `zmq_msg_data`.
        unsafe {
            let size = zmq_sys::zmq_msg_size(msg);
            if size == 0 {
                return &[];
            }
            slice::from_raw_parts(zmq_sys::zmq_msg_data(msg).cast::<u8>(), size)
        }
    }

    /// Mutable message content.
    ///
    /// # Panics
    ///
    /// If the message is not initialized, or is not
    /// [writable](Self::is_writable).
    #[must_use]
    #[track_caller]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let msg = match &mut self.state {
            State::Live {
                msg,
                access: Access::Exclusive,
            } => msg as *mut zmq_msg_t,
            State::Live { .. } => ContractViolation::MessageReadOnly.raise(),
            State::Empty => ContractViolation::MessageNotInitialized.raise(),
        };
        // SAFETY: as in `data`; the buffer belongs to this message alone and
        // &mut self excludes other access.
        unsafe {
            let size = zmq_sys::zmq_msg_size(msg);
            if size == 0 {
                return &mut [];
            }
            slice::from_raw_parts_mut(zmq_sys::zmq_msg_data(msg).cast::<u8>(), size)
        }
    }

    /// Content length in bytes.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    #[must_use]
    #[track_caller]
    pub fn size(&self) -> usize {
        let msg = self.raw();
        // SAFETY: msg is live.
        unsafe { zmq_sys::zmq_msg_size(msg) }
    }

    /// Whether more frames of the same multipart message follow this one.
    ///
    /// # Panics
    ///
    /// If the message is not initialized.
    #[must_use]
    #[track_caller]
    pub fn more(&self) -> bool {
        let msg = self.raw();
        // SAFETY: msg is live.
        unsafe { zmq_sys::zmq_msg_more(msg) != 0 }
    }

    /// Pointer to the live native message, for send/recv.
    #[track_caller]
    pub(crate) fn raw_mut(&mut self) -> *mut zmq_msg_t {
        match &mut self.state {
            State::Live { msg, .. } => msg as *mut zmq_msg_t,
            State::Empty => ContractViolation::MessageNotInitialized.raise(),
        }
    }

    #[track_caller]
    fn access(&self) -> Access {
        match self.state {
            State::Live { access, .. } => access,
            State::Empty => ContractViolation::MessageNotInitialized.raise(),
        }
    }

    /// Record who may write the content after libzmq replaced it.
    pub(crate) fn set_access(&mut self, new: Access) {
        if let State::Live { access, .. } = &mut self.state {
            *access = new;
        }
    }

    /// Read-only accessors go through `*mut` because zmq-sys does not mark
    /// every getter's parameter const; none of them write.
    #[track_caller]
    fn raw(&self) -> *mut zmq_msg_t {
        match &self.state {
            State::Live { msg, .. } => (msg as *const zmq_msg_t).cast_mut(),
            State::Empty => ContractViolation::MessageNotInitialized.raise(),
        }
    }

    #[track_caller]
    fn expect_empty(&self) {
        if self.is_initialized() {
            ContractViolation::MessageAlreadyInitialized.raise();
        }
    }

    fn acquire(
        &mut self,
        access: Access,
        construct: impl FnOnce(*mut zmq_msg_t) -> c_int,
    ) -> Result<()> {
        // SAFETY: zmq_msg_t is a plain byte buffer, all-zero is a valid
        // starting point for the zmq_msg_init* family.
        let mut msg: zmq_msg_t = unsafe { std::mem::zeroed() };
        native::check(construct(std::ptr::addr_of_mut!(msg)))?;
        self.state = State::Live { msg, access };
        Ok(())
    }

    /// Close a live message. The state is `Empty` afterwards whether or not
    /// the close succeeded.
    #[track_caller]
    fn release(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Empty) {
            State::Live { mut msg, .. } => {
                // SAFETY: msg is live and closed exactly once.
                native::check(unsafe { zmq_sys::zmq_msg_close(&mut msg) })?;
                Ok(())
            }
            State::Empty => ContractViolation::MessageNotInitialized.raise(),
        }
    }
}

/// # Safety
///
/// `hint` must be the `Box<T>` leaked by `init_data`; libzmq calls this once.
unsafe extern "C" fn release_boxed<T>(_data: *mut c_void, hint: *mut c_void) {
    drop(Box::from_raw(hint.cast::<T>()));
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Message");
        match self.state {
            State::Empty => out.field("initialized", &false),
            State::Live { access, .. } => out
                .field("initialized", &true)
                .field("size", &self.size())
                .field("writable", &(access == Access::Exclusive)),
        };
        out.finish()
    }
}

impl Drop for Message {
    fn drop(&mut self) {
        if let State::Live { msg, .. } = &mut self.state {
            // Never panics: a message may be dropped during unwinding.
            // SAFETY: msg is live and closed exactly once.
            let rc = unsafe { zmq_sys::zmq_msg_close(msg) };
            if rc != 0 {
                let err = native::last_error();
                tracing::warn!(%err, "failed to close message");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_empty() {
        let msg = Message::new();
        assert!(!msg.is_initialized());
        assert_eq!(format!("{msg:?}"), "Message { initialized: false }");
    }

    #[test]
    fn test_init_size_is_zero_filled() {
        let mut msg = Message::new();
        msg.init_size(64).unwrap();
        assert_eq!(msg.size(), 64);
        assert!(msg.data().iter().all(|&b| b == 0));
        assert!(!msg.more());
    }

    #[test]
    fn test_empty_init_has_no_content() {
        let mut msg = Message::new();
        msg.init().unwrap();
        assert_eq!(msg.size(), 0);
        assert_eq!(msg.data(), b"");
    }

    #[test]
    fn test_access_follows_content() {
        let mut owned = Message::new();
        owned.init_size(8).unwrap();
        assert!(owned.is_writable());

        let mut borrowed = Message::new();
        borrowed.init_data(b"static bytes" as &'static [u8]).unwrap();
        assert!(!borrowed.is_writable());

        // Moving carries the read-only flag along; the source is left empty
        // and writable.
        owned.move_from(&mut borrowed).unwrap();
        assert!(!owned.is_writable());
        assert!(borrowed.is_writable());
        assert_eq!(borrowed.size(), 0);

        owned.rebuild_size(4).unwrap();
        assert!(owned.is_writable());
        assert!(format!("{owned:?}").contains("writable: true"));
    }

    #[test]
    fn test_release_leaves_message_reusable() {
        let mut msg = Message::new();
        msg.init_from_slice(b"abc").unwrap();
        msg.release().unwrap();
        assert!(!msg.is_initialized());
        msg.init_from_slice(b"de").unwrap();
        assert_eq!(msg.data(), b"de");
    }
}
