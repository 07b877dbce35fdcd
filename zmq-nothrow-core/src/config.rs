//! Context configuration
//!
//! Option identifiers for `zmq_ctx_set`/`zmq_ctx_get` and the
//! [`ContextOptions`] builder used by `Context::init_with`.

/// Default number of background I/O threads.
pub const DEFAULT_IO_THREADS: i32 = 1;

/// libzmq context option identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ContextOption {
    /// Size of the I/O thread pool (ZMQ_IO_THREADS)
    IoThreads = 1,
    /// Maximum number of sockets (ZMQ_MAX_SOCKETS)
    MaxSockets = 2,
    /// Largest value `MaxSockets` accepts, read-only (ZMQ_SOCKET_LIMIT)
    SocketLimit = 3,
    /// Largest accepted message size (ZMQ_MAX_MSGSZ)
    MaxMsgSize = 5,
    /// IPv6 default for new sockets (ZMQ_IPV6)
    Ipv6 = 42,
    /// Whether termination blocks on pending messages (ZMQ_BLOCKY)
    Blocky = 70,
}

impl ContextOption {
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Context configuration.
///
/// # Examples
///
/// ```
/// use zmq_nothrow_core::config::{ContextOption, ContextOptions};
///
/// let opts = ContextOptions::new().with_io_threads(2).with_max_sockets(64);
/// assert_eq!(
///     opts.settings(),
///     vec![(ContextOption::IoThreads, 2), (ContextOption::MaxSockets, 64)]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    /// Background I/O threads, always applied
    pub io_threads: i32,
    /// Socket cap, `None` keeps the libzmq default
    pub max_sockets: Option<i32>,
    /// IPv6 default for sockets created afterwards
    pub ipv6: Option<bool>,
    /// Block termination until pending messages are sent
    pub blocky: Option<bool>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            max_sockets: None,
            ipv6: None,
            blocky: None,
        }
    }
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_io_threads(mut self, io_threads: i32) -> Self {
        self.io_threads = io_threads;
        self
    }

    pub fn with_max_sockets(mut self, max_sockets: i32) -> Self {
        self.max_sockets = Some(max_sockets);
        self
    }

    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = Some(enabled);
        self
    }

    pub fn with_blocky(mut self, enabled: bool) -> Self {
        self.blocky = Some(enabled);
        self
    }

    /// The `(option, value)` pairs to apply, I/O threads first.
    #[must_use]
    pub fn settings(&self) -> Vec<(ContextOption, i32)> {
        let mut out = vec![(ContextOption::IoThreads, self.io_threads)];
        if let Some(max) = self.max_sockets {
            out.push((ContextOption::MaxSockets, max));
        }
        if let Some(ipv6) = self.ipv6 {
            out.push((ContextOption::Ipv6, i32::from(ipv6)));
        }
        if let Some(blocky) = self.blocky {
            out.push((ContextOption::Blocky, i32::from(blocky)));
        }
        out
    }
}
