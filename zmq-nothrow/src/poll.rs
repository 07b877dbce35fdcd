//! Readiness polling over sockets and raw file descriptors.

use std::marker::PhantomData;
use std::mem;
use std::os::raw::{c_int, c_long, c_short, c_void};
use std::ptr;
use std::time::Duration;

use zmq_nothrow_core::error::Result;
use zmq_nothrow_core::flags::PollEvents;

use crate::native;
use crate::socket::Socket;

#[cfg(unix)]
pub use std::os::unix::io::RawFd;
/// Native socket handle type on Windows.
#[cfg(windows)]
pub type RawFd = std::os::windows::io::RawSocket;

/// One entry of a [`poll`] set. Layout-compatible with `zmq_pollitem_t`.
#[repr(C)]
pub struct PollItem<'a> {
    socket: *mut c_void,
    fd: RawFd,
    events: c_short,
    revents: c_short,
    marker: PhantomData<&'a ()>,
}

const _: () = assert!(mem::size_of::<PollItem<'static>>() == mem::size_of::<zmq_sys::zmq_pollitem_t>());

impl<'a> PollItem<'a> {
    /// Watch `socket` for `events`.
    ///
    /// # Panics
    ///
    /// If the socket is not initialized.
    #[must_use]
    pub fn from_socket(socket: &'a Socket<'_>, events: PollEvents) -> Self {
        Self {
            socket: socket.as_raw(),
            fd: 0,
            events: events.as_raw(),
            revents: 0,
            marker: PhantomData,
        }
    }

    /// Watch a raw file descriptor (or Windows socket) for `events`.
    #[must_use]
    pub fn from_fd(fd: RawFd, events: PollEvents) -> Self {
        Self {
            socket: ptr::null_mut(),
            fd,
            events: events.as_raw(),
            revents: 0,
            marker: PhantomData,
        }
    }

    /// Events requested.
    #[must_use]
    pub fn events(&self) -> PollEvents {
        PollEvents::from_raw(self.events)
    }

    /// Events reported by the last [`poll`].
    #[must_use]
    pub fn revents(&self) -> PollEvents {
        PollEvents::from_raw(self.revents)
    }

    /// A message can be received without blocking.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.revents().contains(PollEvents::POLLIN)
    }

    /// A message can be sent without blocking.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.revents().contains(PollEvents::POLLOUT)
    }

    /// Error condition on a raw file descriptor.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.revents().contains(PollEvents::POLLERR)
    }
}

/// Wait until at least one item is ready or `timeout` elapses.
///
/// `None` blocks indefinitely, `Some(Duration::ZERO)` returns at once.
/// Returns how many items have events; `revents` is updated on each item.
pub fn poll(items: &mut [PollItem<'_>], timeout: Option<Duration>) -> Result<usize> {
    let timeout_ms: c_long = match timeout {
        None => -1,
        Some(d) => c_long::try_from(d.as_millis()).unwrap_or(c_long::MAX),
    };
    let nitems = c_int::try_from(items.len()).unwrap_or(c_int::MAX);

    // SAFETY: PollItem is repr(C) with zmq_pollitem_t's layout and nitems
    // never exceeds the slice length.
    let rc = unsafe {
        zmq_sys::zmq_poll(
            items.as_mut_ptr().cast::<zmq_sys::zmq_pollitem_t>(),
            nitems,
            timeout_ms,
        )
    };
    let ready = native::check(rc)?;
    tracing::trace!(items = items.len(), ready, "poll returned");
    Ok(ready as usize)
}
