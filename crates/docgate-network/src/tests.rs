//! Unit tests for docgate-network

use proptest::prelude::*;
use test_case::test_case;

use crate::{NetworkClassifier, NetworkContext, RangeTable, TransportMetadata};

fn classify(addr: &str) -> (bool, bool) {
    let ctx = NetworkClassifier::default().classify(addr);
    (ctx.is_private, ctx.is_domestic)
}

// ============================================================================
// Classification table
// ============================================================================

#[test_case("127.0.0.1" => (true, false); "v4 loopback")]
#[test_case("10.20.30.40" => (true, false); "ten slash eight")]
#[test_case("172.16.5.4" => (true, false); "one seven two sixteen")]
#[test_case("192.168.1.1" => (true, false); "one nine two one six eight")]
#[test_case("::1" => (true, false); "v6 loopback")]
#[test_case("fd00::1234" => (true, false); "v6 unique local")]
#[test_case("8.8.8.8" => (false, false); "public foreign")]
#[test_case("126.1.2.3" => (false, true); "softbank domestic")]
#[test_case("13.113.0.1" => (false, true); "aws tokyo domestic")]
#[test_case("::ffff:126.1.2.3" => (false, true); "v4 mapped domestic")]
#[test_case("::ffff:10.0.0.1" => (true, false); "v4 mapped private")]
#[test_case("not-an-address" => (false, false); "garbage")]
#[test_case("" => (false, false); "empty")]
#[test_case("999.1.1.1" => (false, false); "out of range octet")]
fn test_classification(addr: &str) -> (bool, bool) {
    classify(addr)
}

#[test]
fn test_unparsable_address_kept_verbatim() {
    let ctx = NetworkClassifier::default().classify("bogus:addr");
    assert_eq!(ctx, NetworkContext::unclassified("bogus:addr"));
}

#[test]
fn test_custom_domestic_table() {
    let table = RangeTable::parse(&["203.0.113.0/24"]).unwrap();
    let classifier = NetworkClassifier::new(table);

    assert!(classifier.classify("203.0.113.9").is_domestic);
    // Default Japanese ranges are gone once replaced.
    assert!(!classifier.classify("126.1.2.3").is_domestic);
}

#[test]
fn test_empty_domestic_table_classifies_everything_foreign() {
    let classifier = NetworkClassifier::new(RangeTable::default());
    assert!(!classifier.classify("126.1.2.3").is_domestic);
    assert!(classifier.classify("127.0.0.1").is_private);
}

// ============================================================================
// Request classification
// ============================================================================

#[test]
fn test_classify_request_uses_forwarded_for() {
    let meta = TransportMetadata::new("127.0.0.1:9000").with_forwarded_for("8.8.8.8");
    let ctx = NetworkClassifier::default().classify_request(&meta);

    assert_eq!(ctx.ip_address, "8.8.8.8");
    assert!(!ctx.is_private);
}

#[test]
fn test_untrusted_headers_ignored() {
    let meta = TransportMetadata::new("8.8.8.8:9000").with_forwarded_for("127.0.0.1");
    let ctx = NetworkClassifier::default()
        .with_trust_forwarded_headers(false)
        .classify_request(&meta);

    assert_eq!(ctx.ip_address, "8.8.8.8");
    assert!(!ctx.is_private);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Property: classification is total and echoes its input
    #[test]
    fn prop_classify_never_panics(addr in ".{0,64}") {
        let ctx = NetworkClassifier::default().classify(&addr);
        prop_assert_eq!(ctx.ip_address, addr);
    }

    /// Property: every 10.0.0.0/8 address is private and not domestic
    #[test]
    fn prop_ten_slash_eight_is_private(b in 0u8..=255, c in 0u8..=255, d in 0u8..=255) {
        let (private, domestic) = classify(&format!("10.{b}.{c}.{d}"));
        prop_assert!(private);
        prop_assert!(!domestic);
    }

    /// Property: request classification is total for arbitrary header values
    #[test]
    fn prop_classify_request_total(
        peer in ".{0,32}",
        xff in proptest::option::of(".{0,48}"),
        real_ip in proptest::option::of(".{0,32}"),
    ) {
        let meta = TransportMetadata { peer, forwarded_for: xff, real_ip };
        let ctx = NetworkClassifier::default().classify_request(&meta);
        if ctx.ip_address.parse::<std::net::IpAddr>().is_err() {
            prop_assert!(!ctx.is_private && !ctx.is_domestic);
        }
    }
}
