//! Cloudflare native range tables and IP classification
//!
//! Decides whether an address belongs to Cloudflare's own network ("native")
//! or is something else fronting it ("proxied"):
//! - IPv6: textual prefix match against 8 published prefixes
//! - IPv4: linear scan over 14 inclusive numeric ranges
//!
//! Classification never fails. Malformed input simply matches nothing and
//! comes back proxied.
//!
//! # Examples
//!
//! ```
//! use bestip_ranges::classify;
//!
//! assert!(classify("104.16.1.1").is_native);
//! assert!(classify("2606:4700:1234::1").is_native);
//! assert!(!classify("8.8.8.8").is_native);
//! ```

use bestip_core::ip::{ipv4_to_u32, is_ipv6};
use bestip_core::Classification;

pub mod tables;

pub use tables::{NATIVE_IPV4_RANGES, NATIVE_IPV6_PREFIXES};

/// Classify an address as native or proxied
///
/// # Arguments
///
/// * `ip` - IPv4 or IPv6 address in textual form
pub fn classify(ip: &str) -> Classification {
    let native = if is_ipv6(ip) {
        is_native_ipv6(ip)
    } else {
        ipv4_to_u32(ip).is_some_and(is_native_ipv4)
    };

    Classification::from_native(native)
}

/// Check a numeric IPv4 address against the native ranges
pub fn is_native_ipv4(ip: u32) -> bool {
    NATIVE_IPV4_RANGES.iter().any(|range| range.contains(ip))
}

/// Check an IPv6 address against the native prefixes
///
/// Matching is textual, so only the canonical lowercase, non-compressed
/// leading groups that the probes emit will match.
pub fn is_native_ipv6(ip: &str) -> bool {
    NATIVE_IPV6_PREFIXES
        .iter()
        .any(|prefix| ip.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_range_bounds() {
        assert!(classify("104.16.0.0").is_native);
        assert!(classify("104.24.128.77").is_native);
        assert!(classify("104.31.255.255").is_native);
        assert!(!classify("104.15.255.255").is_native);
        assert!(!classify("104.32.0.0").is_native);
    }

    #[test]
    fn test_every_range_endpoint_is_native() {
        for range in NATIVE_IPV4_RANGES.iter() {
            assert!(is_native_ipv4(range.start()), "{}", range);
            assert!(is_native_ipv4(range.end()), "{}", range);
        }
    }

    #[test]
    fn test_outside_ranges_is_proxied() {
        let result = classify("8.8.8.8");
        assert!(!result.is_native);
        assert_eq!(result, Classification::PROXIED);
        assert!(!classify("1.1.1.1").is_native);
        assert!(!classify("192.0.2.1").is_native);
    }

    #[test]
    fn test_ipv6_prefixes() {
        assert!(classify("2606:4700:1234::1").is_native);
        assert!(classify("2a06:98c1:3120::3").is_native);
        assert!(!classify("2001:db8::1").is_native);
        assert!(!classify("2606:4701::1").is_native);
    }

    #[test]
    fn test_every_ipv6_prefix_is_native() {
        for prefix in NATIVE_IPV6_PREFIXES.iter() {
            let ip = format!("{}1::1", prefix);
            assert!(classify(&ip).is_native, "{}", ip);
        }
    }

    #[test]
    fn test_malformed_input_degrades_to_proxied() {
        for input in ["", "garbage", "104.16.0", "104.16.0.0.1", "999.16.0.1", ":", "104.16.x.1"] {
            assert_eq!(classify(input), Classification::PROXIED, "{:?}", input);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(classify("172.64.0.1").label, "CF native");
        assert_eq!(classify("10.0.0.1").label, "Proxy node");
    }
}
