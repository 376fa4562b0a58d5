//! # docgate-network: Client network classification
//!
//! Derives the network attributes of an access request from transport
//! metadata:
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  TransportMetadata                        │
//! │  (peer, X-Forwarded-For, X-Real-IP)       │
//! └───────────────────┬──────────────────────┘
//!                     │ resolve_client_addr
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  NetworkClassifier                        │
//! │  ├─ private/loopback range table          │
//! │  └─ domestic range table (approximate)    │
//! └───────────────────┬──────────────────────┘
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  NetworkContext                           │
//! │  (ip_address, is_private, is_domestic)    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Classification never fails. Anything that cannot be parsed is treated as a
//! public, foreign address so that downstream decisions err towards denial.
//!
//! ## Examples
//!
//! ```
//! use docgate_network::{NetworkClassifier, TransportMetadata};
//!
//! let classifier = NetworkClassifier::default();
//!
//! let ctx = classifier.classify("127.0.0.1");
//! assert!(ctx.is_private);
//!
//! let meta = TransportMetadata::new("10.0.0.5:41000").with_forwarded_for("8.8.8.8, 10.0.0.1");
//! let ctx = classifier.classify_request(&meta);
//! assert_eq!(ctx.ip_address, "8.8.8.8");
//! assert!(!ctx.is_private && !ctx.is_domestic);
//! ```

mod classifier;
mod error;
mod origin;
mod range;

#[cfg(test)]
mod tests;

pub use classifier::{DEFAULT_DOMESTIC_RANGES, NetworkClassifier, NetworkContext, PRIVATE_RANGES};
pub use error::{NetworkError, Result};
pub use origin::{FORWARDED_FOR_HEADER, REAL_IP_HEADER, TransportMetadata, resolve_client_addr};
pub use range::{IpRange, RangeTable};
