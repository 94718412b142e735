//! Result printing in human, JSON and CSV form

use anyhow::Result;
use bestip_core::{EnrichedRecord, LossTier};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

/// One `classify` answer
#[derive(Debug, Serialize)]
pub struct ClassifyResult {
    pub address: String,
    pub native: bool,
    pub ip_type: &'static str,
    pub region: String,
}

impl ClassifyResult {
    pub fn for_address(address: &str) -> Self {
        let classification = bestip_ranges::classify(address);
        Self {
            address: address.to_string(),
            native: classification.is_native,
            ip_type: classification.label,
            region: bestip_region::detect_region(address).to_string(),
        }
    }
}

pub fn print_classified<W: Write>(out: W, results: &[ClassifyResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_classified_human(out, results)?,
        OutputFormat::Json => print_json(out, results, true)?,
        OutputFormat::JsonCompact => print_json(out, results, false)?,
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(out);
            wtr.write_record(["address", "native", "ip_type", "region"])?;
            for result in results {
                wtr.write_record([
                    result.address.as_str(),
                    if result.native { "true" } else { "false" },
                    result.ip_type,
                    result.region.as_str(),
                ])?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

fn print_classified_human<W: Write>(mut out: W, results: &[ClassifyResult]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Classification".bold().cyan())?;
    writeln!(out, "{}", "─".repeat(60).dimmed())?;
    for result in results {
        let ip_type = if result.native {
            result.ip_type.green()
        } else {
            result.ip_type.yellow()
        };
        writeln!(out, "{:>40}  {:<12} {}", result.address.bold(), ip_type, result.region)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn print_records<W: Write>(out: W, records: &[EnrichedRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_records_human(out, records)?,
        OutputFormat::Json => print_json(out, records, true)?,
        OutputFormat::JsonCompact => print_json(out, records, false)?,
        OutputFormat::Csv => print_records_csv(out, records)?,
    }
    Ok(())
}

fn print_records_human<W: Write>(mut out: W, records: &[EnrichedRecord]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{} ({})", "Parsed records".bold().cyan(), records.len())?;
    writeln!(out, "{}", "─".repeat(100).dimmed())?;
    for enriched in records {
        let record = &enriched.record;
        let loss = metric(record.loss_rate_percent);
        let loss = match record.loss_tier() {
            LossTier::High => loss.red(),
            LossTier::Normal => loss.normal(),
        };
        writeln!(
            out,
            "{:<40} {:<10} {:<20} {:<8} loss {:>6}%  {:>7} ms  {:>7} MB/s  {}",
            record.address.bold(),
            enriched.classification.label,
            enriched.region.to_string(),
            record.region_code,
            loss,
            metric(record.average_latency_ms),
            metric(record.download_speed_mbps),
            record.last_updated.dimmed(),
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_records_csv<W: Write>(out: W, records: &[EnrichedRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "address",
        "ip_type",
        "region",
        "region_code",
        "loss_rate_percent",
        "average_latency_ms",
        "download_speed_mbps",
        "last_updated",
    ])?;
    for enriched in records {
        let record = &enriched.record;
        wtr.write_record([
            record.address.clone(),
            enriched.classification.label.to_string(),
            enriched.region.to_string(),
            record.region_code.clone(),
            optional(record.loss_rate_percent),
            optional(record.average_latency_ms),
            optional(record.download_speed_mbps),
            record.last_updated.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn print_json<W: Write, T: Serialize + ?Sized>(mut out: W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestip_records::{parse_enriched, ParseMode};

    #[test]
    fn test_classify_result() {
        let result = ClassifyResult::for_address("1.1.1.1");
        assert!(!result.native);
        assert_eq!(result.ip_type, "Proxy node");
        assert_eq!(result.region, "Cloudflare DNS");

        let result = ClassifyResult::for_address("2606:4700:1234::1");
        assert!(result.native);
        assert_eq!(result.region, "North America");
    }

    #[test]
    fn test_classified_csv() {
        let results = vec![ClassifyResult::for_address("104.16.1.1")];
        let mut buf = Vec::new();
        print_classified(&mut buf, &results, OutputFormat::Csv).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "address,native,ip_type,region\n104.16.1.1,true,CF native,North America\n");
    }

    #[test]
    fn test_classified_json() {
        let results = vec![ClassifyResult::for_address("8.8.8.8")];
        let mut buf = Vec::new();
        print_classified(&mut buf, &results, OutputFormat::JsonCompact).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"native\":false"));
        assert!(text.contains("\"region\":\"Unknown region\""));
    }

    #[test]
    fn test_records_csv() {
        let records = parse_enriched("104.16.1.1,10,10,0.5,42,12.5,LAX,2024-05-01&1.2.3,1", ParseMode::Lenient).unwrap();
        let mut buf = Vec::new();
        print_records(&mut buf, &records, OutputFormat::Csv).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "104.16.1.1,CF native,North America,LAX,0.5,42,12.5,2024-05-01");
    }

    #[test]
    fn test_records_json() {
        let records = parse_enriched("2606:4700::1,10,10,0,30,8", ParseMode::Lenient).unwrap();
        let mut buf = Vec::new();
        print_records(&mut buf, &records, OutputFormat::Json).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"last_updated\": \"unknown\""));
        assert!(text.contains("\"region\": \"North America\""));
    }

    #[test]
    fn test_records_human() {
        colored::control::set_override(false);
        let records = parse_enriched("8.8.8.8,10,9,10,80,3", ParseMode::Lenient).unwrap();
        let mut buf = Vec::new();
        print_records(&mut buf, &records, OutputFormat::Human).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Parsed records (1)"));
        assert!(text.contains("8.8.8.8"));
        assert!(text.contains("Proxy node"));
    }
}
