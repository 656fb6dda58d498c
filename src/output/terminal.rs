// Colored terminal output for verdicts and scan reports.
//
// main.rs delegates all human-readable formatting here; JSON output goes
// straight through serde_json instead.

use colored::Colorize;

use crate::classifier::{ClassificationResult, Details};
use crate::model::Label;
use crate::pipeline::scan::ScanReport;

/// Display the verdict for a single URL.
pub fn display_result(url: &str, result: &ClassificationResult) {
    println!(
        "  {:<9} {:<10} {}",
        colorize_label(result.label()),
        result.method().to_string().dimmed(),
        super::truncate_chars(url, 90),
    );
    println!("            {}", describe_details(result.details()).dimmed());
}

/// Display a scan report: one line per URL, then the summary.
pub fn display_scan_report(report: &ScanReport) {
    if report.results.is_empty() {
        println!("No URLs found in the input.");
        return;
    }

    println!(
        "\n{}",
        format!("=== URL Scan ({} URLs) ===", report.urls_checked).bold()
    );
    println!();

    for verdict in &report.results {
        display_result(&verdict.url, &verdict.result);
    }

    println!();
    let summary = format!(
        "{} of {} URLs malicious (risk score {:.2})",
        report.malicious_urls_found, report.urls_checked, report.score
    );
    if report.malicious_urls_found > 0 {
        println!("  {} {}", "!!".red().bold(), summary);
    } else {
        println!("  {}", summary.green());
    }
}

/// One-line explanation of the evidence behind a verdict.
pub fn describe_details(details: &Details) -> String {
    match details {
        Details::Blacklist { source } => format!("listed in {source} blacklist"),
        Details::Heuristic(flags) => format!("rules fired: {}", flags.fired().join(", ")),
        Details::Ml(features) => format!(
            "model features: length={} host_dots={} slashes={} ip={}",
            features.url_length,
            features.num_dots_in_host,
            features.num_slashes_in_url,
            features.has_ip_address
        ),
    }
}

fn colorize_label(label: Label) -> colored::ColoredString {
    match label {
        Label::Malicious => label.as_str().red().bold(),
        Label::Safe => label.as_str().green(),
    }
}
