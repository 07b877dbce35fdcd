//! Owning wrapper over a libzmq context.

use std::fmt;
use std::os::raw::c_void;
use std::ptr::NonNull;

use zmq_nothrow_core::config::{ContextOption, ContextOptions};
use zmq_nothrow_core::error::{ContractViolation, Result};

use crate::native;

/// The engine's I/O thread pool and socket registry.
///
/// Created empty; [`init`](Self::init) acquires the native context. Sockets
/// borrow the context they were created from, so it cannot be dropped
/// while any of them is alive.
///
/// # Examples
///
/// ```rust,no_run
/// use zmq_nothrow::Context;
///
/// let mut ctx = Context::new();
/// if let Err(err) = ctx.init(1) {
///     eprintln!("no context: {err}");
///     return;
/// }
/// ```
pub struct Context {
    handle: Option<NonNull<c_void>>,
}

// SAFETY: libzmq contexts are thread-safe.
unsafe impl Send for Context {}
unsafe impl Sync for Context {}

impl Context {
    /// An uninitialized context. Acquires nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Whether a native context is held.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Acquire a native context with `io_threads` background I/O threads.
    ///
    /// On failure nothing is held and the context may be initialized again.
    ///
    /// # Panics
    ///
    /// If the context is already initialized.
    pub fn init(&mut self, io_threads: i32) -> Result<()> {
        self.init_with(&ContextOptions::new().with_io_threads(io_threads))
    }

    /// Acquire a native context configured from `options`.
    ///
    /// # Panics
    ///
    /// If the context is already initialized.
    pub fn init_with(&mut self, options: &ContextOptions) -> Result<()> {
        if self.handle.is_some() {
            ContractViolation::ContextAlreadyInitialized.raise();
        }

        // SAFETY: plain constructor, returns null on failure.
        let raw = unsafe { zmq_sys::zmq_ctx_new() };
        let Some(handle) = NonNull::new(raw) else {
            return Err(native::last_error());
        };

        for (option, value) in options.settings() {
            // SAFETY: handle is a live context owned by this frame.
            let rc = unsafe { zmq_sys::zmq_ctx_set(handle.as_ptr(), option.as_raw(), value) };
            if let Err(err) = native::check(rc) {
                tracing::debug!(?option, value, %err, "context option rejected");
                // No sockets exist yet, termination cannot block.
                // SAFETY: handle is live and released exactly once here.
                unsafe { zmq_sys::zmq_ctx_term(handle.as_ptr()) };
                return Err(err);
            }
        }

        tracing::debug!(io_threads = options.io_threads, "context initialized");
        self.handle = Some(handle);
        Ok(())
    }

    /// The raw `void *` context for direct libzmq calls.
    ///
    /// # Panics
    ///
    /// If the context is not initialized.
    #[must_use]
    #[track_caller]
    pub fn as_raw(&self) -> *mut c_void {
        match self.handle {
            Some(handle) => handle.as_ptr(),
            None => ContractViolation::ContextNotInitialized.raise(),
        }
    }

    /// Set a context option (`zmq_ctx_set`).
    pub fn set_option(&self, option: ContextOption, value: i32) -> Result<()> {
        let ctx = self.as_raw();
        // SAFETY: ctx is live for the duration of &self.
        native::check(unsafe { zmq_sys::zmq_ctx_set(ctx, option.as_raw(), value) })?;
        Ok(())
    }

    /// Read a context option (`zmq_ctx_get`).
    pub fn get_option(&self, option: ContextOption) -> Result<i32> {
        let ctx = self.as_raw();
        // SAFETY: ctx is live for the duration of &self.
        native::check(unsafe { zmq_sys::zmq_ctx_get(ctx, option.as_raw()) })
    }

    /// Make every blocking call on this context's sockets fail with `ETERM`.
    ///
    /// The context stays allocated until dropped; sockets can still be
    /// closed, nothing new can be created or connected.
    pub fn shutdown(&self) -> Result<()> {
        let ctx = self.as_raw();
        // SAFETY: ctx is live; shutdown is thread-safe.
        native::check(unsafe { zmq_sys::zmq_ctx_shutdown(ctx) })?;
        tracing::debug!("context shut down");
        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        loop {
            // SAFETY: handle was produced by zmq_ctx_new and is released once.
            let rc = unsafe { zmq_sys::zmq_ctx_term(handle.as_ptr()) };
            if rc == 0 {
                tracing::debug!("context terminated");
                return;
            }

            let err = native::last_error();
            if err.is_interrupted() {
                continue;
            }
            ContractViolation::TeardownFailed {
                what: "context",
                errno: err.errno().unwrap_or(-1),
            }
            .raise_in_drop();
            return;
        }
    }
}
