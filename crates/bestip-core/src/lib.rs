//! Core types for BestIP
//!
//! This crate provides the foundational types shared by the BestIP workspace:
//! - [`IpRecord`] - One parsed measurement row
//! - [`Classification`] - Native vs proxied verdict for an address
//! - [`Region`] - Coarse data center region label
//! - [`RangeEntry`] - Inclusive IPv4 interval used by the static tables
//! - [`EnrichedRecord`] - A record with its classification and region attached
//!
//! ```
//! use bestip_core::{RangeEntry, ip::ipv4_to_u32};
//!
//! const RANGE: RangeEntry = RangeEntry::new("104.16.0.0", "104.31.255.255");
//! assert!(RANGE.contains(ipv4_to_u32("104.16.1.1").unwrap()));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

pub mod ip;

/// Placeholder for region codes and timestamps absent from a row
pub const UNKNOWN: &str = "unknown";

/// One measurement row from a dataset blob
///
/// Rows arrive in three layouts (6, 7 or 8 fields); the parser fills in
/// [`UNKNOWN`] for the trailing fields a layout does not carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpRecord {
    /// IPv4 or IPv6 address in textual form
    pub address: String,
    /// Probe packets sent
    pub packets_sent: Option<u64>,
    /// Probe packets received
    pub packets_received: Option<u64>,
    /// Packet loss in percent
    pub loss_rate_percent: Option<f64>,
    /// Mean round-trip latency in milliseconds
    pub average_latency_ms: Option<f64>,
    /// Download throughput in MB/s
    pub download_speed_mbps: Option<f64>,
    /// Colo/region code reported by the prober
    pub region_code: String,
    /// When the prober last measured this address
    pub last_updated: String,
}

impl IpRecord {
    /// True when the address is in IPv6 textual form
    pub fn is_ipv6(&self) -> bool {
        ip::is_ipv6(&self.address)
    }

    /// Loss rating used for highlighting
    pub fn loss_tier(&self) -> LossTier {
        LossTier::from_percent(self.loss_rate_percent)
    }

    /// Throughput rating used for highlighting
    pub fn speed_tier(&self) -> SpeedTier {
        SpeedTier::from_mbps(self.download_speed_mbps)
    }
}

/// Native vs proxied verdict for an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Address belongs to Cloudflare's published ranges
    pub is_native: bool,
    /// Display label
    pub label: &'static str,
}

impl Classification {
    /// Address inside Cloudflare's own ranges
    pub const NATIVE: Self = Self {
        is_native: true,
        label: "CF native",
    };

    /// Anything else, typically a reverse proxy in front of Cloudflare
    pub const PROXIED: Self = Self {
        is_native: false,
        label: "Proxy node",
    };

    /// Verdict from a boolean match
    pub fn from_native(is_native: bool) -> Self {
        if is_native {
            Self::NATIVE
        } else {
            Self::PROXIED
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Coarse data center region
///
/// Static and non-authoritative: derived from range tables, not from a
/// geolocation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "Asia-Pacific")]
    AsiaPacific,
    #[serde(rename = "Oceania")]
    Oceania,
    #[serde(rename = "Africa")]
    Africa,
    #[serde(rename = "South America")]
    SouthAmerica,
    #[serde(rename = "Cloudflare DNS")]
    CloudflareDns,
    #[serde(rename = "Global multi-region")]
    GlobalMultiRegion,
    #[serde(rename = "Unknown region")]
    Unknown,
}

impl Region {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::Oceania => "Oceania",
            Region::Africa => "Africa",
            Region::SouthAmerica => "South America",
            Region::CloudflareDns => "Cloudflare DNS",
            Region::GlobalMultiRegion => "Global multi-region",
            Region::Unknown => "Unknown region",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive IPv4 interval
///
/// Built from dotted-quad literals at compile time so static tables stay
/// readable and are validated by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeEntry {
    start: u32,
    end: u32,
}

impl RangeEntry {
    /// Range from two dotted-quad literals
    pub const fn new(start: &str, end: &str) -> Self {
        Self {
            start: ip::ipv4_const(start),
            end: ip::ipv4_const(end),
        }
    }

    /// First address
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last address
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Check if the numeric address falls inside the range
    pub fn contains(&self, ip: u32) -> bool {
        self.start <= ip && ip <= self.end
    }
}

impl fmt::Display for RangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            Ipv4Addr::from(self.start),
            Ipv4Addr::from(self.end)
        )
    }
}

/// Packet loss rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LossTier {
    Normal,
    High,
}

impl LossTier {
    /// Loss above 5 % is high; unparseable values are normal
    pub fn from_percent(loss: Option<f64>) -> Self {
        match loss {
            Some(loss) if loss > 5.0 => LossTier::High,
            _ => LossTier::Normal,
        }
    }
}

/// Download speed rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Fast,
    Medium,
    Slow,
}

impl SpeedTier {
    /// Above 10 MB/s is fast, above 5 MB/s medium, everything else slow
    pub fn from_mbps(speed: Option<f64>) -> Self {
        match speed {
            Some(speed) if speed > 10.0 => SpeedTier::Fast,
            Some(speed) if speed > 5.0 => SpeedTier::Medium,
            _ => SpeedTier::Slow,
        }
    }
}

/// A record with its classification and region attached
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: IpRecord,
    pub classification: Classification,
    pub region: Region,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> IpRecord {
        IpRecord {
            address: "104.16.1.1".to_string(),
            packets_sent: Some(100),
            packets_received: Some(98),
            loss_rate_percent: Some(2.0),
            average_latency_ms: Some(20.5),
            download_speed_mbps: Some(12.0),
            region_code: "LAX".to_string(),
            last_updated: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_range_contains_inclusive() {
        let range = RangeEntry::new("104.16.0.0", "104.31.255.255");
        assert!(range.contains(0x68100000));
        assert!(range.contains(0x681FFFFF));
        assert!(!range.contains(0x680FFFFF));
        assert!(!range.contains(0x68200000));
    }

    #[test]
    fn test_range_display() {
        let range = RangeEntry::new("103.21.244.0", "103.21.247.255");
        assert_eq!(range.to_string(), "103.21.244.0-103.21.247.255");
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::from_native(true), Classification::NATIVE);
        assert_eq!(Classification::from_native(false).to_string(), "Proxy node");
        assert!(Classification::NATIVE.is_native);
    }

    #[test]
    fn test_region_display() {
        assert_eq!(Region::CloudflareDns.to_string(), "Cloudflare DNS");
        assert_eq!(Region::Unknown.to_string(), "Unknown region");
    }

    #[test]
    fn test_region_serializes_as_label() {
        let json = serde_json::to_string(&Region::AsiaPacific).expect("serialization failed");
        assert_eq!(json, "\"Asia-Pacific\"");
    }

    #[test]
    fn test_loss_tier() {
        assert_eq!(LossTier::from_percent(Some(5.0)), LossTier::Normal);
        assert_eq!(LossTier::from_percent(Some(5.1)), LossTier::High);
        assert_eq!(LossTier::from_percent(None), LossTier::Normal);
    }

    #[test]
    fn test_speed_tier() {
        assert_eq!(SpeedTier::from_mbps(Some(10.5)), SpeedTier::Fast);
        assert_eq!(SpeedTier::from_mbps(Some(10.0)), SpeedTier::Medium);
        assert_eq!(SpeedTier::from_mbps(Some(5.0)), SpeedTier::Slow);
        assert_eq!(SpeedTier::from_mbps(None), SpeedTier::Slow);
    }

    #[test]
    fn test_record_helpers() {
        let record = sample_record();
        assert!(!record.is_ipv6());
        assert_eq!(record.loss_tier(), LossTier::Normal);
        assert_eq!(record.speed_tier(), SpeedTier::Fast);
    }

    #[test]
    fn test_enriched_record_serialization() {
        let enriched = EnrichedRecord {
            record: sample_record(),
            classification: Classification::NATIVE,
            region: Region::NorthAmerica,
        };

        let json = serde_json::to_string(&enriched).expect("serialization failed");
        assert!(json.contains("\"address\":\"104.16.1.1\""));
        assert!(json.contains("\"is_native\":true"));
        assert!(json.contains("\"region\":\"North America\""));
    }
}
