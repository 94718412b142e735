//! Region lookup data
//!
//! Everything the detector knows lives here; edit these tables, not the
//! lookup code. Order matters in every table: the first match wins and
//! nothing checks for overlap. For example the Oceania slice of
//! `104.16.0.0/12` is shadowed by the North America entry above it.

use bestip_core::{RangeEntry, Region};

/// IPv4 ranges per region, scanned in order
pub static IPV4_REGION_TABLE: [(Region, &[RangeEntry]); 6] = [
    (
        Region::NorthAmerica,
        &[
            RangeEntry::new("103.21.244.0", "103.21.247.255"),
            RangeEntry::new("103.22.200.0", "103.22.203.255"),
            RangeEntry::new("104.16.0.0", "104.31.255.255"),
            RangeEntry::new("108.162.192.0", "108.162.255.255"),
            RangeEntry::new("131.0.72.0", "131.0.75.255"),
            RangeEntry::new("141.101.64.0", "141.101.127.255"),
            RangeEntry::new("162.158.0.0", "162.158.127.255"),
            RangeEntry::new("172.64.0.0", "172.65.255.255"),
            RangeEntry::new("173.245.48.0", "173.245.63.255"),
            RangeEntry::new("198.41.192.0", "198.41.255.255"),
        ],
    ),
    (
        Region::Europe,
        &[
            RangeEntry::new("162.158.128.0", "162.158.255.255"),
            RangeEntry::new("172.66.0.0", "172.67.255.255"),
            RangeEntry::new("188.114.96.0", "188.114.127.255"),
            RangeEntry::new("190.93.240.0", "190.93.255.255"),
        ],
    ),
    (
        Region::AsiaPacific,
        &[
            RangeEntry::new("103.31.4.0", "103.31.7.255"),
            RangeEntry::new("162.158.158.0", "162.158.159.255"),
            RangeEntry::new("172.68.0.0", "172.69.255.255"),
            RangeEntry::new("203.0.113.0", "203.0.113.255"),
        ],
    ),
    (
        Region::Oceania,
        &[
            RangeEntry::new("104.16.96.0", "104.16.127.255"),
            RangeEntry::new("172.64.192.0", "172.64.223.255"),
        ],
    ),
    (
        Region::Africa,
        &[
            RangeEntry::new("172.64.104.0", "172.64.111.255"),
            RangeEntry::new("162.158.38.0", "162.158.39.255"),
        ],
    ),
    (
        Region::SouthAmerica,
        &[RangeEntry::new("172.64.16.0", "172.64.31.255")],
    ),
];

/// IPv4 textual prefixes consulted after the range table misses
pub static IPV4_PREFIX_HINTS: [(&str, Region); 15] = [
    ("1.0.0.", Region::CloudflareDns),
    ("1.1.1.", Region::CloudflareDns),
    ("104.16.", Region::NorthAmerica),
    ("104.17.", Region::NorthAmerica),
    ("104.18.", Region::AsiaPacific),
    ("104.19.", Region::AsiaPacific),
    ("104.20.", Region::Europe),
    ("104.21.", Region::Europe),
    ("104.22.", Region::AsiaPacific),
    ("104.23.", Region::AsiaPacific),
    ("104.24.", Region::NorthAmerica),
    ("104.25.", Region::NorthAmerica),
    ("162.158.", Region::GlobalMultiRegion),
    ("172.64.", Region::GlobalMultiRegion),
    ("172.65.", Region::GlobalMultiRegion),
];

/// IPv6 prefixes with a dedicated region, in priority order
pub static IPV6_REGION_PREFIXES: [(&str, Region); 8] = [
    ("2606:4700:", Region::NorthAmerica),
    ("2a06:98c0:", Region::Europe),
    ("2c0f:f248:", Region::AsiaPacific),
    ("2400:cb00:", Region::Oceania),
    ("2803:f800:", Region::SouthAmerica),
    ("2a06:98c1:", Region::Africa),
    // Remaining Cloudflare prefixes without a region of their own
    ("2405:8100:", Region::AsiaPacific),
    ("2405:b500:", Region::AsiaPacific),
];
