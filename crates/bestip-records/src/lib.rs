//! Measurement blob parsing
//!
//! A dataset blob is one string holding every probe result: rows separated
//! by `&`, fields by `,`. Three row layouts are in circulation:
//!
//! | fields | layout |
//! |--------|--------|
//! | 6 | `ip,sent,received,loss%,latency_ms,speed_mbps` |
//! | 7 | 6-field layout + `updated` |
//! | 8 | 6-field layout + `region_code,updated` |
//!
//! Parsing is lenient by default: short rows are dropped without a
//! diagnostic. [`ParseMode::Strict`] turns those into errors instead.
//!
//! # Examples
//!
//! ```
//! use bestip_records::parse_records;
//!
//! let records = parse_records("1.2.3.4,100,98,1.5,20,15,US,2024-01-01&1.2.3,1");
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].region_code, "US");
//! ```

use bestip_core::{EnrichedRecord, IpRecord, UNKNOWN};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use thiserror::Error;

/// Separator between rows in a blob
pub const ROW_DELIMITER: char = '&';

/// Separator between fields in a row
pub const FIELD_DELIMITER: char = ',';

/// Fewest fields a usable row carries
pub const MIN_FIELDS: usize = 6;

/// Most fields any known layout carries
pub const MAX_FIELDS: usize = 8;

/// Strict-mode parse errors
///
/// Row numbers are zero-based positions in the blob.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Row does not match any known layout
    #[error("Row {row}: expected 6-8 fields, found {found}")]
    FieldCount { row: usize, found: usize },

    /// First field is not an IP address
    #[error("Row {row}: invalid IP address: {address}")]
    InvalidAddress { row: usize, address: String },

    /// Numeric field failed to parse
    #[error("Row {row}: invalid {field}: {value}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// How to treat rows that do not fit a known layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop short rows, default unparseable numbers to `None`
    #[default]
    Lenient,
    /// Reject malformed rows, addresses and numbers
    Strict,
}

/// Parse a blob leniently
///
/// Rows with fewer than [`MIN_FIELDS`] fields are dropped. An empty blob
/// yields an empty vector. Input row order is preserved.
pub fn parse_records(blob: &str) -> Vec<IpRecord> {
    blob.split(ROW_DELIMITER)
        .enumerate()
        .filter_map(|(index, row)| {
            let fields: Vec<&str> = row.split(FIELD_DELIMITER).collect();
            let record = build_record(&fields);
            if record.is_none() {
                tracing::trace!(row = index, fields = fields.len(), "dropping short row");
            }
            record
        })
        .collect()
}

/// Parse a blob in the given mode
///
/// In strict mode, empty rows (such as the one after a trailing `&`) are
/// still skipped; anything else that does not parse cleanly is an error.
///
/// # Arguments
///
/// * `blob` - Raw dataset string
/// * `mode` - Lenient or strict handling of malformed rows
pub fn parse_records_with(blob: &str, mode: ParseMode) -> Result<Vec<IpRecord>> {
    match mode {
        ParseMode::Lenient => Ok(parse_records(blob)),
        ParseMode::Strict => blob
            .split(ROW_DELIMITER)
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(index, row)| parse_row_strict(index, row))
            .collect(),
    }
}

/// Parse a single row leniently
pub fn parse_row(row: &str) -> Option<IpRecord> {
    let fields: Vec<&str> = row.split(FIELD_DELIMITER).collect();
    build_record(&fields)
}

fn parse_row_strict(index: usize, row: &str) -> Result<IpRecord> {
    let fields: Vec<&str> = row.split(FIELD_DELIMITER).collect();

    if !(MIN_FIELDS..=MAX_FIELDS).contains(&fields.len()) {
        return Err(ParseError::FieldCount {
            row: index,
            found: fields.len(),
        });
    }

    if fields[0].parse::<IpAddr>().is_err() {
        return Err(ParseError::InvalidAddress {
            row: index,
            address: fields[0].to_string(),
        });
    }

    let numeric = [
        ("packets sent", fields[1], true),
        ("packets received", fields[2], true),
        ("loss rate", fields[3], false),
        ("latency", fields[4], false),
        ("download speed", fields[5], false),
    ];
    for (field, value, integer) in numeric {
        let ok = if integer {
            value.trim().parse::<u64>().is_ok()
        } else {
            value.trim().parse::<f64>().is_ok()
        };
        if !ok {
            return Err(ParseError::InvalidNumber {
                row: index,
                field,
                value: value.to_string(),
            });
        }
    }

    // Field count and numbers were checked above
    build_record(&fields).ok_or(ParseError::FieldCount {
        row: index,
        found: fields.len(),
    })
}

fn build_record(fields: &[&str]) -> Option<IpRecord> {
    if fields.len() < MIN_FIELDS {
        return None;
    }

    // Rows longer than any known layout carry no trailing fields we trust
    let (region_code, last_updated) = match fields.len() {
        8 => (fields[6], fields[7]),
        7 => (UNKNOWN, fields[6]),
        _ => (UNKNOWN, UNKNOWN),
    };

    Some(IpRecord {
        address: fields[0].to_string(),
        packets_sent: fields[1].trim().parse().ok(),
        packets_received: fields[2].trim().parse().ok(),
        loss_rate_percent: fields[3].trim().parse().ok(),
        average_latency_ms: fields[4].trim().parse().ok(),
        download_speed_mbps: fields[5].trim().parse().ok(),
        region_code: region_code.to_string(),
        last_updated: if last_updated.is_empty() {
            UNKNOWN.to_string()
        } else {
            last_updated.to_string()
        },
    })
}

/// First field of every row, malformed rows included
///
/// Backs the plain-text address lists, which never looked at field counts.
pub fn first_column(blob: &str) -> Vec<&str> {
    blob.split(ROW_DELIMITER)
        .map(|row| row.split(FIELD_DELIMITER).next().unwrap_or(row))
        .collect()
}

/// Attach classification and region to a record
pub fn enrich(record: IpRecord) -> EnrichedRecord {
    EnrichedRecord {
        classification: bestip_ranges::classify(&record.address),
        region: bestip_region::detect_region(&record.address),
        record,
    }
}

/// Parse a blob and enrich every surviving record
pub fn parse_enriched(blob: &str, mode: ParseMode) -> Result<Vec<EnrichedRecord>> {
    Ok(parse_records_with(blob, mode)?
        .into_iter()
        .map(enrich)
        .collect())
}
