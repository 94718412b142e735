//! Cloudflare published address space
//!
//! Source: https://www.cloudflare.com/ips/ (ips-v4 / ips-v6), expanded to
//! inclusive ranges. Kept separate from the region table in `bestip-region`;
//! the two overlap but are maintained independently.

use bestip_core::RangeEntry;

/// IPv4 ranges announced by Cloudflare
pub static NATIVE_IPV4_RANGES: [RangeEntry; 14] = [
    RangeEntry::new("103.21.244.0", "103.21.247.255"),   // 103.21.244.0/22
    RangeEntry::new("103.22.200.0", "103.22.203.255"),   // 103.22.200.0/22
    RangeEntry::new("103.31.4.0", "103.31.7.255"),       // 103.31.4.0/22
    RangeEntry::new("104.16.0.0", "104.31.255.255"),     // 104.16.0.0/12
    RangeEntry::new("108.162.192.0", "108.162.255.255"), // 108.162.192.0/18
    RangeEntry::new("131.0.72.0", "131.0.75.255"),       // 131.0.72.0/22
    RangeEntry::new("141.101.64.0", "141.101.127.255"),  // 141.101.64.0/18
    RangeEntry::new("162.158.0.0", "162.159.255.255"),   // 162.158.0.0/15
    RangeEntry::new("172.64.0.0", "172.71.255.255"),     // 172.64.0.0/13
    RangeEntry::new("173.245.48.0", "173.245.63.255"),   // 173.245.48.0/20
    RangeEntry::new("188.114.96.0", "188.114.127.255"),  // 188.114.96.0/19
    RangeEntry::new("190.93.240.0", "190.93.255.255"),   // 190.93.240.0/20
    RangeEntry::new("197.234.240.0", "197.234.243.255"), // 197.234.240.0/22
    RangeEntry::new("198.41.128.0", "198.41.255.255"),   // 198.41.128.0/17
];

/// IPv6 prefixes announced by Cloudflare, matched textually
pub static NATIVE_IPV6_PREFIXES: [&str; 8] = [
    "2400:cb00:",
    "2405:8100:",
    "2405:b500:",
    "2606:4700:",
    "2803:f800:",
    "2a06:98c0:",
    "2a06:98c1:",
    "2c0f:f248:",
];
