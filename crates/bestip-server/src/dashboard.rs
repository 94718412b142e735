//! HTML dashboard rendering
//!
//! One page, two tabs (IPv4 / IPv6), one table per tab. Every value that
//! came from the store is escaped before it is written.

use bestip_core::{EnrichedRecord, LossTier, SpeedTier, UNKNOWN};
use std::fmt::Write;

/// Everything the page shows
#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    pub ipv4: Vec<EnrichedRecord>,
    pub ipv6: Vec<EnrichedRecord>,
    pub ipv4_time: Option<String>,
    pub ipv6_time: Option<String>,
    pub year: i32,
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f3f4f6; color: #1f2937; }
main { max-width: 72rem; margin: 0 auto; padding: 1.5rem; }
h1 { text-align: center; }
.tabs { display: flex; gap: .5rem; align-items: center; margin-bottom: .75rem; }
.tabs button { border: 0; border-radius: .375rem; padding: .375rem .75rem; cursor: pointer; background: #e5e7eb; }
.tabs button.active { background: #2563eb; color: #fff; }
.updated { margin-left: auto; font-size: .875rem; color: #6b7280; }
table { width: 100%; border-collapse: collapse; background: #fff; font-size: .875rem; }
th, td { padding: .5rem .75rem; border-bottom: 1px solid #e5e7eb; text-align: left; }
td.addr { font-family: ui-monospace, monospace; font-size: .75rem; }
.pill { padding: .125rem .5rem; border-radius: 9999px; font-size: .75rem; }
.native, .loss-normal { background: #dcfce7; color: #15803d; }
.proxy, .code { background: #dbeafe; color: #1d4ed8; }
.loss-high { background: #fee2e2; color: #b91c1c; }
.speed-fast { color: #16a34a; font-weight: 500; }
.speed-medium { color: #2563eb; font-weight: 500; }
.speed-slow { color: #4b5563; font-weight: 500; }
.empty { padding: 2rem; text-align: center; color: #6b7280; background: #fff; }
.hidden { display: none; }
footer { text-align: center; font-size: .75rem; color: #6b7280; padding: 1rem; }
"#;

const SCRIPT: &str = r#"
function showTab(name) {
  for (const family of ['ipv4', 'ipv6']) {
    document.getElementById(family + '-panel').classList.toggle('hidden', family !== name);
    document.getElementById(family + '-tab').classList.toggle('active', family === name);
    document.getElementById(family + '-time').classList.toggle('hidden', family !== name);
  }
}
"#;

const HEADERS: [&str; 8] = [
    "IP address",
    "IP type",
    "Data center",
    "Region code",
    "Loss rate",
    "Avg latency",
    "Download speed",
    "Updated",
];

/// Render the full page
pub fn render(page: &DashboardPage) -> String {
    let mut html = String::with_capacity(8 * 1024 + 512 * (page.ipv4.len() + page.ipv6.len()));

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>CloudFlare BestIP</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<main>\n<h1>CloudFlare BestIP</h1>\n");

    html.push_str("<div class=\"tabs\">\n");
    html.push_str("<button id=\"ipv4-tab\" class=\"active\" onclick=\"showTab('ipv4')\">IPv4</button>\n");
    html.push_str("<button id=\"ipv6-tab\" onclick=\"showTab('ipv6')\">IPv6</button>\n");
    push_update_time(&mut html, "ipv4", page.ipv4_time.as_deref(), false);
    push_update_time(&mut html, "ipv6", page.ipv6_time.as_deref(), true);
    html.push_str("</div>\n");

    push_panel(&mut html, "ipv4", "IPv4", &page.ipv4, false);
    push_panel(&mut html, "ipv6", "IPv6", &page.ipv6, true);

    html.push_str("</main>\n");
    let _ = writeln!(
        html,
        "<footer>&copy; {} CloudFlare BestIP &middot; addresses are probed periodically; no CDN service is provided</footer>",
        page.year
    );
    html.push_str("<script>");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

fn push_update_time(html: &mut String, family: &str, time: Option<&str>, hidden: bool) {
    let _ = writeln!(
        html,
        "<div id=\"{family}-time\" class=\"updated{}\">Updated: {}</div>",
        if hidden { " hidden" } else { "" },
        escape(time.unwrap_or(UNKNOWN))
    );
}

fn push_panel(
    html: &mut String,
    family: &str,
    label: &str,
    records: &[EnrichedRecord],
    hidden: bool,
) {
    let _ = writeln!(
        html,
        "<section id=\"{family}-panel\"{}>",
        if hidden { " class=\"hidden\"" } else { "" }
    );

    if records.is_empty() {
        let _ = writeln!(html, "<div class=\"empty\">No {} data available</div>", label);
    } else {
        html.push_str("<table>\n<thead>\n<tr>");
        for header in HEADERS {
            let _ = write!(html, "<th>{}</th>", header);
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for record in records {
            push_row(html, record);
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</section>\n");
}

fn push_row(html: &mut String, enriched: &EnrichedRecord) {
    let record = &enriched.record;
    let type_class = if enriched.classification.is_native {
        "native"
    } else {
        "proxy"
    };
    let loss_class = match record.loss_tier() {
        LossTier::High => "loss-high",
        LossTier::Normal => "loss-normal",
    };
    let speed_class = match record.speed_tier() {
        SpeedTier::Fast => "speed-fast",
        SpeedTier::Medium => "speed-medium",
        SpeedTier::Slow => "speed-slow",
    };

    let _ = writeln!(
        html,
        "<tr><td class=\"addr\">{}</td>\
         <td><span class=\"pill {}\">{}</span></td>\
         <td>{}</td>\
         <td><span class=\"pill code\">{}</span></td>\
         <td><span class=\"pill {}\">{}%</span></td>\
         <td>{} ms</td>\
         <td><span class=\"{}\">{}</span> MB/s</td>\
         <td>{}</td></tr>",
        escape(&record.address),
        type_class,
        enriched.classification.label,
        enriched.region,
        escape(&record.region_code),
        loss_class,
        metric(record.loss_rate_percent),
        metric(record.average_latency_ms),
        speed_class,
        metric(record.download_speed_mbps),
        escape(&record.last_updated),
    );
}

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestip_records::{parse_enriched, ParseMode};

    fn page(ipv4: &str, ipv6: &str) -> DashboardPage {
        DashboardPage {
            ipv4: parse_enriched(ipv4, ParseMode::Lenient).unwrap(),
            ipv6: parse_enriched(ipv6, ParseMode::Lenient).unwrap(),
            ipv4_time: Some("2024-05-01 08:00".to_string()),
            ipv6_time: None,
            year: 2024,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;");
        assert_eq!(escape("104.16.0.1"), "104.16.0.1");
    }

    #[test]
    fn test_renders_rows_with_labels() {
        let html = render(&page(
            "104.16.1.1,10,10,0.5,42,12.5,LAX,2024-05-01&8.8.8.8,10,9,10,80,3",
            "2606:4700::1,10,10,0,30,8",
        ));

        assert!(html.contains("<td class=\"addr\">104.16.1.1</td>"));
        assert!(html.contains("CF native"));
        assert!(html.contains("Proxy node"));
        assert!(html.contains("North America"));
        assert!(html.contains("<span class=\"pill code\">LAX</span>"));
        assert!(html.contains("<span class=\"pill loss-high\">10%</span>"));
        assert!(html.contains("<span class=\"speed-fast\">12.5</span>"));
        assert!(html.contains("<span class=\"speed-medium\">8</span>"));
        assert!(html.contains("<span class=\"speed-slow\">3</span>"));
        assert!(html.contains("Updated: 2024-05-01 08:00"));
        assert!(html.contains("Updated: unknown"));
        assert!(html.contains("&copy; 2024"));
    }

    #[test]
    fn test_escapes_store_values() {
        let html = render(&page("<script>,1,1,0,1,1,<i>,\"now\"", ""));
        assert!(!html.contains("<script>,"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;i&gt;"));
        assert!(html.contains("&quot;now&quot;"));
    }

    #[test]
    fn test_empty_family_placeholder() {
        let html = render(&page("104.16.1.1,10,10,0,42,12", ""));
        assert!(html.contains("No IPv6 data available"));
        assert!(!html.contains("No IPv4 data available"));
    }

    #[test]
    fn test_missing_metrics_render_dash() {
        let html = render(&page("104.16.1.1,x,x,x,x,x", ""));
        assert!(html.contains("<span class=\"pill loss-normal\">-%</span>"));
        assert!(html.contains("<td>- ms</td>"));
    }
}
