//! Coarse data center region detection
//!
//! Maps a Cloudflare address to one of a fixed set of [`Region`] labels
//! using static tables only (no geolocation database):
//! - IPv6: prefix match in priority order
//! - IPv4: per-region range table, then textual prefix hints
//!
//! Unrecognized or malformed input yields [`Region::Unknown`]; detection
//! never fails.
//!
//! # Examples
//!
//! ```
//! use bestip_core::Region;
//! use bestip_region::detect_region;
//!
//! assert_eq!(detect_region("1.1.1.1"), Region::CloudflareDns);
//! assert_eq!(detect_region("104.16.1.1"), Region::NorthAmerica);
//! assert_eq!(detect_region("192.0.2.1"), Region::Unknown);
//! ```

use bestip_core::ip::{ipv4_to_u32, is_ipv6};
use bestip_core::{RangeEntry, Region};

pub mod tables;

/// Region detector over a set of lookup tables
///
/// [`RegionDetector::new`] uses the built-in tables from [`tables`]; custom
/// tables can be supplied with [`RegionDetector::with_tables`].
#[derive(Debug, Clone, Copy)]
pub struct RegionDetector {
    ipv4_table: &'static [(Region, &'static [RangeEntry])],
    ipv4_hints: &'static [(&'static str, Region)],
    ipv6_prefixes: &'static [(&'static str, Region)],
}

impl RegionDetector {
    /// Create a detector over the built-in tables
    ///
    /// # Examples
    ///
    /// ```
    /// use bestip_region::RegionDetector;
    ///
    /// let detector = RegionDetector::new();
    /// ```
    pub fn new() -> Self {
        Self {
            ipv4_table: &tables::IPV4_REGION_TABLE,
            ipv4_hints: &tables::IPV4_PREFIX_HINTS,
            ipv6_prefixes: &tables::IPV6_REGION_PREFIXES,
        }
    }

    /// Create a detector over custom tables
    ///
    /// # Arguments
    ///
    /// * `ipv4_table` - Ordered region ranges, first match wins
    /// * `ipv4_hints` - Textual prefixes tried after the range table
    /// * `ipv6_prefixes` - Ordered IPv6 prefixes
    pub const fn with_tables(
        ipv4_table: &'static [(Region, &'static [RangeEntry])],
        ipv4_hints: &'static [(&'static str, Region)],
        ipv6_prefixes: &'static [(&'static str, Region)],
    ) -> Self {
        Self {
            ipv4_table,
            ipv4_hints,
            ipv6_prefixes,
        }
    }

    /// Detect the region for an address
    ///
    /// # Arguments
    ///
    /// * `ip` - IPv4 or IPv6 address in textual form
    pub fn detect(&self, ip: &str) -> Region {
        if is_ipv6(ip) {
            return first_prefix(self.ipv6_prefixes, ip).unwrap_or(Region::Unknown);
        }

        // An unparseable address skips the numeric table but can still hit a
        // textual hint
        ipv4_to_u32(ip)
            .and_then(|num| self.lookup_ipv4(num))
            .or_else(|| first_prefix(self.ipv4_hints, ip))
            .unwrap_or(Region::Unknown)
    }

    /// Look up a numeric IPv4 address in the range table only
    pub fn lookup_ipv4(&self, ip: u32) -> Option<Region> {
        self.ipv4_table
            .iter()
            .find(|(_, ranges)| ranges.iter().any(|range| range.contains(ip)))
            .map(|(region, _)| *region)
    }
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn first_prefix(table: &[(&str, Region)], ip: &str) -> Option<Region> {
    table
        .iter()
        .find(|(prefix, _)| ip.starts_with(prefix))
        .map(|(_, region)| *region)
}

/// Detect the region for an address using the built-in tables
pub fn detect_region(ip: &str) -> Region {
    RegionDetector::new().detect(ip)
}
