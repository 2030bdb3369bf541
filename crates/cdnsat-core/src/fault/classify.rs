//! Classify curl errors into fault kinds.

use std::fmt;

/// High-level kind of a network fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Connect or transfer timed out.
    Timeout,
    /// Host (or proxy) name could not be resolved.
    Resolve,
    /// Connection refused, reset, or closed without a reply.
    Connection,
    /// TLS handshake or certificate failure.
    Tls,
    /// Malformed or truncated HTTP exchange.
    Protocol,
    /// Anything else curl reports.
    Other,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultKind::Timeout => "timeout",
            FaultKind::Resolve => "dns",
            FaultKind::Connection => "connection",
            FaultKind::Tls => "tls",
            FaultKind::Protocol => "protocol",
            FaultKind::Other => "other",
        };
        f.write_str(s)
    }
}

pub fn classify_curl_error(e: &curl::Error) -> FaultKind {
    if e.is_operation_timedout() {
        return FaultKind::Timeout;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return FaultKind::Resolve;
    }
    if e.is_couldnt_connect()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FaultKind::Connection;
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cipher()
    {
        return FaultKind::Tls;
    }
    // 8 is CURLE_WEIRD_SERVER_REPLY, which has no named accessor.
    if e.code() == 8 || e.is_partial_file() || e.is_http2_error() {
        return FaultKind::Protocol;
    }
    FaultKind::Other
}
