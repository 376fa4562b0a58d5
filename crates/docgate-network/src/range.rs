//! CIDR address ranges and range tables.

use std::fmt::{self, Display};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NetworkError, Result};

// ============================================================================
// IpRange
// ============================================================================

/// A CIDR block such as `10.0.0.0/8` or `fc00::/7`.
///
/// Membership never crosses address families: an IPv6 address is never
/// inside an IPv4 block and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange {
    network: IpAddr,
    prefix_len: u8,
}

impl IpRange {
    /// Creates an IPv4 block. `prefix_len` must be at most 32.
    pub const fn v4(octets: [u8; 4], prefix_len: u8) -> Self {
        Self {
            network: IpAddr::V4(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])),
            prefix_len,
        }
    }

    /// Creates an IPv6 block from its eight segments. `prefix_len` must be at most 128.
    pub const fn v6(segments: [u16; 8], prefix_len: u8) -> Self {
        Self {
            network: IpAddr::V6(Ipv6Addr::new(
                segments[0],
                segments[1],
                segments[2],
                segments[3],
                segments[4],
                segments[5],
                segments[6],
                segments[7],
            )),
            prefix_len,
        }
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns whether `ip` falls inside this block.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(addr)) => {
                let mask = v4_mask(self.prefix_len);
                u32::from(net) & mask == u32::from(addr) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(addr)) => {
                let mask = v6_mask(self.prefix_len);
                u128::from(net) & mask == u128::from(addr) & mask
            }
            _ => false,
        }
    }
}

fn v4_mask(prefix_len: u8) -> u32 {
    u32::MAX
        .checked_shl(32 - u32::from(prefix_len.min(32)))
        .unwrap_or(0)
}

fn v6_mask(prefix_len: u8) -> u128 {
    u128::MAX
        .checked_shl(128 - u32::from(prefix_len.min(128)))
        .unwrap_or(0)
}

impl FromStr for IpRange {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (addr, prefix) = trimmed
            .split_once('/')
            .ok_or_else(|| NetworkError::invalid_range(s, "missing '/<prefix>'"))?;

        let network: IpAddr = addr
            .parse()
            .map_err(|_| NetworkError::invalid_range(s, "invalid network address"))?;
        let prefix_len: u8 = prefix
            .parse()
            .map_err(|_| NetworkError::invalid_range(s, "invalid prefix length"))?;

        let max = if network.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            return Err(NetworkError::invalid_range(
                s,
                format!("prefix length {prefix_len} exceeds {max}"),
            ));
        }

        // Normalise host bits so equal blocks compare equal.
        let network = match network {
            IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(prefix_len))),
            IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(prefix_len))),
        };

        Ok(Self {
            network,
            prefix_len,
        })
    }
}

impl Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl Serialize for IpRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// RangeTable
// ============================================================================

/// An unordered set of address ranges checked by linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    ranges: Vec<IpRange>,
}

impl RangeTable {
    pub fn new(ranges: Vec<IpRange>) -> Self {
        Self { ranges }
    }

    /// Parses every entry; the first malformed entry fails the whole table.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let ranges = entries
            .iter()
            .map(|entry| entry.as_ref().parse())
            .collect::<Result<Vec<IpRange>>>()?;
        Ok(Self { ranges })
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.ranges.iter().any(|range| range.contains(ip))
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
