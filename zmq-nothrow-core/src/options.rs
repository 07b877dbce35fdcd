//! Socket configuration options
//!
//! Raw option identifiers for `zmq_setsockopt`/`zmq_getsockopt`, their value
//! encoding, and a declarative [`SocketOptions`] builder that turns into a
//! list of settings.

use std::borrow::Cow;
use std::time::Duration;

use bytes::Bytes;

/// libzmq socket option identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SocketOption {
    Affinity = 4,
    RoutingId = 5,
    Subscribe = 6,
    Unsubscribe = 7,
    Rate = 8,
    RecoveryIvl = 9,
    SndBuf = 11,
    RcvBuf = 12,
    RcvMore = 13,
    Events = 15,
    Type = 16,
    Linger = 17,
    ReconnectIvl = 18,
    Backlog = 19,
    ReconnectIvlMax = 21,
    MaxMsgSize = 22,
    SndHwm = 23,
    RcvHwm = 24,
    MulticastHops = 25,
    RcvTimeo = 27,
    SndTimeo = 28,
    LastEndpoint = 32,
    RouterMandatory = 33,
    TcpKeepalive = 34,
    Immediate = 39,
    Ipv6 = 42,
    Conflate = 54,
    HandshakeIvl = 66,
    ConnectTimeout = 79,
}

/// C type libzmq uses for an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Int64,
    UInt64,
    Bytes,
}

impl SocketOption {
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// The value type `Socket::set_option` accepts for this option.
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Affinity => ValueKind::UInt64,
            Self::MaxMsgSize => ValueKind::Int64,
            Self::RoutingId | Self::Subscribe | Self::Unsubscribe | Self::LastEndpoint => {
                ValueKind::Bytes
            }
            _ => ValueKind::Int,
        }
    }
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Int(i32),
    Int64(i64),
    UInt64(u64),
    Bytes(Bytes),
}

impl OptionValue {
    /// Boolean options are ints holding 0 or 1.
    #[must_use]
    pub const fn flag(value: bool) -> Self {
        Self::Int(value as i32)
    }

    /// Millisecond option from an optional duration; `None` encodes -1
    /// (infinite), durations beyond `i32::MAX` ms saturate.
    #[must_use]
    pub fn millis(duration: Option<Duration>) -> Self {
        match duration {
            None => Self::Int(-1),
            Some(d) => Self::Int(i32::try_from(d.as_millis()).unwrap_or(i32::MAX)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Int64(_) => ValueKind::Int64,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Native-endian buffer handed to `zmq_setsockopt`.
    #[must_use]
    pub fn as_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Int(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            Self::Int64(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            Self::UInt64(v) => Cow::Owned(v.to_ne_bytes().to_vec()),
            Self::Bytes(b) => Cow::Borrowed(b.as_ref()),
        }
    }
}

/// Declarative socket configuration.
///
/// Every field left at `None` keeps libzmq's own default; nothing is sent
/// to the engine for it.
///
/// # Examples
///
/// ```
/// use zmq_nothrow_core::options::SocketOptions;
/// use std::time::Duration;
///
/// let opts = SocketOptions::default()
///     .with_recv_timeout(Duration::from_secs(5))
///     .with_linger(Duration::ZERO);
/// assert_eq!(opts.settings().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketOptions {
    /// Socket identity (ZMQ_ROUTING_ID), applied before anything else
    pub routing_id: Option<Bytes>,

    /// Receive timeout (ZMQ_RCVTIMEO)
    ///
    /// - `Some(Duration::ZERO)`: Non-blocking (return immediately with EAGAIN)
    /// - `Some(duration)`: Wait up to duration before returning EAGAIN
    pub recv_timeout: Option<Duration>,

    /// Send timeout (ZMQ_SNDTIMEO)
    pub send_timeout: Option<Duration>,

    /// Linger period on close (ZMQ_LINGER)
    ///
    /// `Some(Duration::ZERO)` discards pending messages immediately.
    pub linger: Option<Duration>,

    /// Reconnect interval (ZMQ_RECONNECT_IVL)
    pub reconnect_ivl: Option<Duration>,

    /// Maximum reconnect interval for exponential backoff (ZMQ_RECONNECT_IVL_MAX)
    pub reconnect_ivl_max: Option<Duration>,

    /// TCP connect timeout (ZMQ_CONNECT_TIMEOUT)
    pub connect_timeout: Option<Duration>,

    /// ZMTP handshake timeout (ZMQ_HANDSHAKE_IVL)
    pub handshake_timeout: Option<Duration>,

    /// High water mark for receiving, in messages (ZMQ_RCVHWM)
    pub recv_hwm: Option<i32>,

    /// High water mark for sending, in messages (ZMQ_SNDHWM)
    pub send_hwm: Option<i32>,

    /// Only queue messages to completed connections (ZMQ_IMMEDIATE)
    pub immediate: Option<bool>,

    /// Maximum inbound message size in bytes, -1 for no limit (ZMQ_MAXMSGSIZE)
    pub max_msg_size: Option<i64>,

    /// Report unroutable ROUTER messages as errors (ZMQ_ROUTER_MANDATORY)
    pub router_mandatory: Option<bool>,

    /// Keep only the last message in the queues (ZMQ_CONFLATE)
    pub conflate: Option<bool>,

    /// Enable IPv6 on the socket (ZMQ_IPV6)
    pub ipv6: Option<bool>,

    /// SO_KEEPALIVE override: -1 OS default, 0 off, 1 on (ZMQ_TCP_KEEPALIVE)
    pub tcp_keepalive: Option<i32>,

    /// SUB prefixes (ZMQ_SUBSCRIBE), applied last
    pub subscriptions: Vec<Bytes>,
}

impl SocketOptions {
    /// Create new socket options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set receive timeout. `Duration::ZERO` makes every receive
    /// non-blocking.
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = Some(timeout);
        self
    }

    /// Set send timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Set linger period.
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = Some(linger);
        self
    }

    /// Set reconnect interval.
    pub fn with_reconnect_ivl(mut self, ivl: Duration) -> Self {
        self.reconnect_ivl = Some(ivl);
        self
    }

    /// Set maximum reconnect interval.
    pub fn with_reconnect_ivl_max(mut self, max: Duration) -> Self {
        self.reconnect_ivl_max = Some(max);
        self
    }

    /// Set connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set handshake timeout.
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = Some(timeout);
        self
    }

    /// Set receive high water mark.
    pub fn with_recv_hwm(mut self, hwm: i32) -> Self {
        self.recv_hwm = Some(hwm);
        self
    }

    /// Set send high water mark.
    pub fn with_send_hwm(mut self, hwm: i32) -> Self {
        self.send_hwm = Some(hwm);
        self
    }

    /// Set immediate mode.
    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = Some(immediate);
        self
    }

    /// Set maximum message size.
    pub fn with_max_msg_size(mut self, size: i64) -> Self {
        self.max_msg_size = Some(size);
        self
    }

    /// Set socket identity.
    pub fn with_routing_id(mut self, id: impl Into<Bytes>) -> Self {
        self.routing_id = Some(id.into());
        self
    }

    /// Set ROUTER mandatory mode.
    pub fn with_router_mandatory(mut self, enabled: bool) -> Self {
        self.router_mandatory = Some(enabled);
        self
    }

    /// Set conflate mode.
    pub fn with_conflate(mut self, enabled: bool) -> Self {
        self.conflate = Some(enabled);
        self
    }

    /// Enable or disable IPv6.
    pub fn with_ipv6(mut self, enabled: bool) -> Self {
        self.ipv6 = Some(enabled);
        self
    }

    /// Set TCP keepalive override.
    pub fn with_tcp_keepalive(mut self, keepalive: i32) -> Self {
        self.tcp_keepalive = Some(keepalive);
        self
    }

    /// Add a SUB prefix. An empty prefix subscribes to everything.
    pub fn with_subscription(mut self, prefix: impl Into<Bytes>) -> Self {
        self.subscriptions.push(prefix.into());
        self
    }

    /// The `(option, value)` pairs to apply, in application order.
    #[must_use]
    pub fn settings(&self) -> Vec<(SocketOption, OptionValue)> {
        let mut out = Vec::new();

        if let Some(id) = &self.routing_id {
            out.push((SocketOption::RoutingId, OptionValue::Bytes(id.clone())));
        }

        let durations = [
            (SocketOption::RcvTimeo, self.recv_timeout),
            (SocketOption::SndTimeo, self.send_timeout),
            (SocketOption::Linger, self.linger),
            (SocketOption::ReconnectIvl, self.reconnect_ivl),
            (SocketOption::ReconnectIvlMax, self.reconnect_ivl_max),
            (SocketOption::ConnectTimeout, self.connect_timeout),
            (SocketOption::HandshakeIvl, self.handshake_timeout),
        ];
        for (option, duration) in durations {
            if duration.is_some() {
                out.push((option, OptionValue::millis(duration)));
            }
        }

        let ints = [
            (SocketOption::RcvHwm, self.recv_hwm),
            (SocketOption::SndHwm, self.send_hwm),
            (SocketOption::TcpKeepalive, self.tcp_keepalive),
        ];
        out.extend(
            ints.into_iter()
                .filter_map(|(option, v)| v.map(|v| (option, OptionValue::Int(v)))),
        );

        let flags = [
            (SocketOption::Immediate, self.immediate),
            (SocketOption::RouterMandatory, self.router_mandatory),
            (SocketOption::Conflate, self.conflate),
            (SocketOption::Ipv6, self.ipv6),
        ];
        out.extend(
            flags
                .into_iter()
                .filter_map(|(option, v)| v.map(|v| (option, OptionValue::flag(v)))),
        );

        if let Some(size) = self.max_msg_size {
            out.push((SocketOption::MaxMsgSize, OptionValue::Int64(size)));
        }

        for prefix in &self.subscriptions {
            out.push((SocketOption::Subscribe, OptionValue::Bytes(prefix.clone())));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = SocketOptions::default();
        assert_eq!(opts.recv_timeout, None);
        assert_eq!(opts.linger, None);
        assert!(opts.subscriptions.is_empty());
        assert!(opts.settings().is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let opts = SocketOptions::new()
            .with_recv_timeout(Duration::from_secs(5))
            .with_send_hwm(500)
            .with_conflate(true);

        assert_eq!(opts.recv_timeout, Some(Duration::from_secs(5)));
        assert_eq!(opts.send_hwm, Some(500));
        assert_eq!(opts.conflate, Some(true));
    }

    #[test]
    fn test_settings_order() {
        let opts = SocketOptions::new()
            .with_subscription("weather.")
            .with_linger(Duration::from_millis(250))
            .with_routing_id(Bytes::from_static(b"client-1"))
            .with_max_msg_size(4096)
            .with_immediate(true);

        let settings = opts.settings();
        let order: Vec<SocketOption> = settings.iter().map(|(o, _)| *o).collect();
        assert_eq!(
            order,
            vec![
                SocketOption::RoutingId,
                SocketOption::Linger,
                SocketOption::Immediate,
                SocketOption::MaxMsgSize,
                SocketOption::Subscribe,
            ]
        );
        assert_eq!(settings[1].1, OptionValue::Int(250));
        assert_eq!(settings[3].1, OptionValue::Int64(4096));
        assert_eq!(settings[4].1, OptionValue::Bytes(Bytes::from_static(b"weather.")));
    }

    #[test]
    fn test_value_encoding() {
        assert_eq!(OptionValue::Int(7).as_bytes().as_ref(), &7i32.to_ne_bytes());
        assert_eq!(OptionValue::UInt64(3).as_bytes().len(), 8);
        assert_eq!(OptionValue::flag(true), OptionValue::Int(1));
        assert_eq!(OptionValue::millis(None), OptionValue::Int(-1));
        assert_eq!(
            OptionValue::millis(Some(Duration::from_secs(u64::MAX))),
            OptionValue::Int(i32::MAX)
        );

        let prefix = OptionValue::Bytes(Bytes::from_static(b"topic"));
        assert!(matches!(prefix.as_bytes(), Cow::Borrowed(_)));
        assert_eq!(prefix.as_bytes().as_ref(), b"topic");
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(SocketOption::Linger.value_kind(), ValueKind::Int);
        assert_eq!(SocketOption::MaxMsgSize.value_kind(), ValueKind::Int64);
        assert_eq!(SocketOption::Affinity.value_kind(), ValueKind::UInt64);
        assert_eq!(SocketOption::Subscribe.value_kind(), ValueKind::Bytes);
        assert_eq!(SocketOption::Type.as_raw(), 16);
    }
}
