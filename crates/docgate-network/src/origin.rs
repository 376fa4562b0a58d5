//! Client address resolution from transport metadata.
//!
//! Precedence, first present source wins:
//! 1. `X-Forwarded-For` (left-most entry)
//! 2. `X-Real-IP`
//! 3. The transport peer address with any port stripped

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Header carrying the proxy forwarding chain.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Header carrying a single-hop client address override.
pub const REAL_IP_HEADER: &str = "X-Real-IP";

/// Request-level transport metadata relevant to origin classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportMetadata {
    /// Raw peer address as reported by the transport, usually `host:port`.
    pub peer: String,
    /// Value of the `X-Forwarded-For` header, if sent.
    pub forwarded_for: Option<String>,
    /// Value of the `X-Real-IP` header, if sent.
    pub real_ip: Option<String>,
}

impl TransportMetadata {
    pub fn new(peer: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            forwarded_for: None,
            real_ip: None,
        }
    }

    pub fn with_forwarded_for(mut self, value: impl Into<String>) -> Self {
        self.forwarded_for = Some(value.into());
        self
    }

    pub fn with_real_ip(mut self, value: impl Into<String>) -> Self {
        self.real_ip = Some(value.into());
        self
    }

    /// Drops both forwarding headers, leaving only the transport peer.
    pub fn without_forwarding_headers(&self) -> Self {
        Self::new(self.peer.clone())
    }
}

/// Resolves the caller's address string.
///
/// Never fails; the result may be unparsable and is classified later.
pub fn resolve_client_addr(meta: &TransportMetadata) -> String {
    if let Some(first) = meta
        .forwarded_for
        .as_deref()
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = meta
        .real_ip
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return real_ip.to_string();
    }

    strip_port(meta.peer.trim())
}

/// Strips a trailing port from `host:port` or `[v6]:port`.
///
/// Input that is not in either form is returned unchanged.
fn strip_port(peer: &str) -> String {
    if let Ok(socket) = peer.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }

    if let Some(rest) = peer.strip_prefix('[') {
        if let Some((host, port)) = rest.split_once("]:") {
            if port.parse::<u16>().is_ok() {
                return host.to_string();
            }
        }
    }

    if let Some((host, port)) = peer.rsplit_once(':') {
        if !host.contains(':') && port.parse::<u16>().is_ok() {
            return host.to_string();
        }
    }

    peer.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_forwarded_for_wins_over_everything() {
        let meta = TransportMetadata::new("10.0.0.1:5555")
            .with_forwarded_for(" 203.0.113.7 , 10.0.0.2")
            .with_real_ip("198.51.100.1");
        assert_eq!(resolve_client_addr(&meta), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_used_without_forwarded_for() {
        let meta = TransportMetadata::new("10.0.0.1:5555").with_real_ip(" 198.51.100.1 ");
        assert_eq!(resolve_client_addr(&meta), "198.51.100.1");
    }

    #[test]
    fn test_blank_headers_fall_through_to_peer() {
        let meta = TransportMetadata::new("192.0.2.10:443")
            .with_forwarded_for("  ")
            .with_real_ip("");
        assert_eq!(resolve_client_addr(&meta), "192.0.2.10");
    }

    #[test]
    fn test_empty_first_hop_falls_through() {
        let meta = TransportMetadata::new("192.0.2.10:443").with_forwarded_for(" , 10.0.0.2");
        assert_eq!(resolve_client_addr(&meta), "192.0.2.10");
    }

    #[test]
    fn test_without_forwarding_headers_keeps_peer() {
        let meta = TransportMetadata::new("192.0.2.10:443").with_forwarded_for("10.0.0.2");
        assert_eq!(
            resolve_client_addr(&meta.without_forwarding_headers()),
            "192.0.2.10"
        );
    }

    #[test_case("127.0.0.1:8080" => "127.0.0.1"; "v4 with port")]
    #[test_case("[::1]:8080" => "::1"; "bracketed v6 with port")]
    #[test_case("::1" => "::1"; "bare v6")]
    #[test_case("127.0.0.1" => "127.0.0.1"; "v4 without port")]
    #[test_case("localhost:80" => "localhost"; "hostname with port")]
    #[test_case("garbage" => "garbage"; "unparsable passes through")]
    #[test_case("" => ""; "empty")]
    fn test_strip_port(peer: &str) -> String {
        strip_port(peer)
    }
}
