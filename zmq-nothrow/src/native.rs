//! Status-code plumbing shared by every wrapper.

use std::ffi::CStr;
use std::os::raw::c_int;

use zmq_nothrow_core::error::{Result, ZmqError};

/// Capture the calling thread's last libzmq error.
pub(crate) fn last_error() -> ZmqError {
    // SAFETY: zmq_errno only reads thread-local errno.
    let errno = unsafe { zmq_sys::zmq_errno() };
    ZmqError::native(errno, strerror(errno))
}

/// libzmq's description of an errno value.
pub fn strerror(errno: i32) -> String {
    // SAFETY: zmq_strerror returns a pointer to a static string (or null).
    let ptr = unsafe { zmq_sys::zmq_strerror(errno) };
    if ptr.is_null() {
        return format!("unknown error {errno}");
    }
    // SAFETY: non-null, NUL-terminated and 'static per libzmq.
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

/// Map a `-1`-on-failure return code to a `Result`.
pub(crate) fn check(rc: c_int) -> Result<c_int> {
    if rc == -1 {
        Err(last_error())
    } else {
        Ok(rc)
    }
}

/// Version of the linked libzmq as `(major, minor, patch)`.
pub fn version() -> (i32, i32, i32) {
    let (mut major, mut minor, mut patch) = (0, 0, 0);
    // SAFETY: the three out-pointers are valid for the duration of the call.
    unsafe { zmq_sys::zmq_version(&mut major, &mut minor, &mut patch) };
    (major, minor, patch)
}
