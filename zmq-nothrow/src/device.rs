//! Built-in message forwarding between two sockets.

use std::ptr;

use zmq_nothrow_core::device::DeviceKind;
use zmq_nothrow_core::error::Result;

use crate::native;
use crate::socket::Socket;

/// Run a built-in device between `frontend` and `backend`.
///
/// Blocks the calling thread until the owning context is shut down or
/// terminated, then returns the engine's error (`ETERM`). `kind` names the
/// intended wiring; libzmq serves every kind with the same proxy.
///
/// # Panics
///
/// If either socket is not initialized.
pub fn device(kind: DeviceKind, frontend: &Socket<'_>, backend: &Socket<'_>) -> Result<()> {
    tracing::debug!(%kind, "device starting");
    proxy(frontend, backend, None)
}

/// Forward messages both ways between `frontend` and `backend`, copying
/// every message to `capture` when given.
///
/// Returns only when the context stops (see [`device`]).
///
/// # Panics
///
/// If any socket is not initialized.
pub fn proxy(
    frontend: &Socket<'_>,
    backend: &Socket<'_>,
    capture: Option<&Socket<'_>>,
) -> Result<()> {
    let capture = capture.map_or(ptr::null_mut(), Socket::as_raw);
    // SAFETY: all handles are live; capture may be null.
    let rc = unsafe { zmq_sys::zmq_proxy(frontend.as_raw(), backend.as_raw(), capture) };
    native::check(rc).map(drop).map_err(|err| {
        tracing::debug!(%err, "proxy stopped");
        err
    })
}
