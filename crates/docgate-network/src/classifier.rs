//! Private/public and domestic/foreign classification of client addresses.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::origin::{TransportMetadata, resolve_client_addr};
use crate::range::{IpRange, RangeTable};

// ============================================================================
// Range tables
// ============================================================================

/// Private and loopback ranges for both address families.
pub const PRIVATE_RANGES: [IpRange; 6] = [
    IpRange::v4([10, 0, 0, 0], 8),
    IpRange::v4([172, 16, 0, 0], 12),
    IpRange::v4([192, 168, 0, 0], 16),
    IpRange::v4([127, 0, 0, 0], 8),
    IpRange::v6([0, 0, 0, 0, 0, 0, 0, 1], 128),
    IpRange::v6([0xfc00, 0, 0, 0, 0, 0, 0, 0], 7),
];

/// Approximate Japanese provider and cloud-region ranges.
///
/// A sample, not a GeoIP database. Deployments that need accuracy replace
/// it through configuration.
pub const DEFAULT_DOMESTIC_RANGES: [IpRange; 21] = [
    // NTT
    IpRange::v4([1, 0, 16, 0], 20),
    IpRange::v4([1, 0, 64, 0], 18),
    IpRange::v4([1, 1, 0, 0], 16),
    IpRange::v4([1, 21, 0, 0], 16),
    IpRange::v4([1, 33, 0, 0], 16),
    // KDDI
    IpRange::v4([27, 80, 0, 0], 12),
    IpRange::v4([49, 96, 0, 0], 11),
    IpRange::v4([60, 32, 0, 0], 11),
    // SoftBank
    IpRange::v4([61, 192, 0, 0], 12),
    IpRange::v4([114, 48, 0, 0], 13),
    IpRange::v4([126, 0, 0, 0], 8),
    // IIJ
    IpRange::v4([202, 232, 0, 0], 13),
    // AWS Tokyo
    IpRange::v4([13, 112, 0, 0], 14),
    IpRange::v4([13, 230, 0, 0], 15),
    IpRange::v4([18, 176, 0, 0], 13),
    // Google Cloud Tokyo
    IpRange::v4([34, 84, 0, 0], 14),
    IpRange::v4([35, 187, 192, 0], 19),
    IpRange::v4([35, 189, 128, 0], 17),
    // Azure Japan
    IpRange::v4([20, 43, 64, 0], 18),
    IpRange::v4([20, 189, 0, 0], 18),
    IpRange::v4([40, 74, 0, 0], 16),
];

// ============================================================================
// NetworkContext
// ============================================================================

/// Classified origin of one request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkContext {
    /// The resolved address string, verbatim even when unparsable.
    pub ip_address: String,
    pub is_private: bool,
    pub is_domestic: bool,
}

impl NetworkContext {
    /// The least privileged classification for `ip_address`.
    pub fn unclassified(ip_address: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            is_private: false,
            is_domestic: false,
        }
    }
}

// ============================================================================
// NetworkClassifier
// ============================================================================

/// Classifies client addresses against fixed range tables.
///
/// Classification is synchronous, side-effect free and total: malformed
/// input yields a public, foreign context rather than an error.
#[derive(Debug, Clone)]
pub struct NetworkClassifier {
    private: RangeTable,
    domestic: RangeTable,
    trust_forwarded_headers: bool,
}

impl Default for NetworkClassifier {
    fn default() -> Self {
        Self::new(RangeTable::new(DEFAULT_DOMESTIC_RANGES.to_vec()))
    }
}

impl NetworkClassifier {
    /// Creates a classifier with the standard private table and the given domestic table.
    pub fn new(domestic: RangeTable) -> Self {
        Self {
            private: RangeTable::new(PRIVATE_RANGES.to_vec()),
            domestic,
            trust_forwarded_headers: true,
        }
    }

    /// Controls whether forwarding headers are honoured (default: true).
    ///
    /// Disable when the gateway is reachable without a trusted proxy in front.
    pub fn with_trust_forwarded_headers(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    pub fn domestic_table(&self) -> &RangeTable {
        &self.domestic
    }

    /// Classifies a single address string.
    pub fn classify(&self, addr: &str) -> NetworkContext {
        let Some(ip) = parse_ip(addr) else {
            debug!(addr = %addr, "unparsable client address classified as public/foreign");
            return NetworkContext::unclassified(addr);
        };

        let context = NetworkContext {
            ip_address: addr.to_string(),
            is_private: self.private.contains(ip),
            is_domestic: self.domestic.contains(ip),
        };

        debug!(
            addr = %addr,
            is_private = context.is_private,
            is_domestic = context.is_domestic,
            "client address classified"
        );
        context
    }

    /// Resolves the client address from transport metadata and classifies it.
    pub fn classify_request(&self, meta: &TransportMetadata) -> NetworkContext {
        let addr = if self.trust_forwarded_headers {
            resolve_client_addr(meta)
        } else {
            resolve_client_addr(&meta.without_forwarding_headers())
        };
        self.classify(&addr)
    }
}

/// Parses an address, folding IPv4-mapped IPv6 onto IPv4.
fn parse_ip(addr: &str) -> Option<IpAddr> {
    let ip: IpAddr = addr.trim().parse().ok()?;
    Some(match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(ip, IpAddr::V4),
        IpAddr::V4(_) => ip,
    })
}
