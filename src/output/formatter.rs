use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::geo::EnrichmentReport;
use crate::scoring::ScoredListing;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a display score: one decimal place on the 0-10 scale.
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Format a price as GBP with thousands separators ("£380,000").
/// No decimals; asking prices don't have pennies.
pub fn format_price(price: Option<f64>) -> String {
    let price = match price {
        Some(p) => p.round() as i64,
        None => return "-".to_string(),
    };

    let digits = price.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if price < 0 {
        format!("-£{}", grouped)
    } else {
        format!("£{}", grouped)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate an address to fit available width, accounting for Unicode
fn truncate_address(address: &str, max_width: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= max_width {
        address.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn opt_num(value: Option<impl std::fmt::Display>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Format listings as a scored table.
/// Columns: Index, Score, Price, Beds, Zone, Travel, EPC, Address.
/// Index column: 3 chars (fits "99."), right-aligned.
pub fn format_scored_table(entries: &[ScoredListing], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No listings found.".to_string();
    }

    let term_width = get_terminal_width();

    // Fixed columns: " 1." + score(5) + price(9) + beds(4) + zone(4) +
    // travel(6) + epc(3) + separators.
    let fixed_width = 3 + 1 + 5 + 2 + 9 + 2 + 4 + 2 + 4 + 2 + 6 + 2 + 3 + 2;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let listing = &entry.listing;
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>5}", format_score(entry.score()));
            let price_str = format!("{:>9}", format_price(listing.price));
            let beds_str = format!("{:>4}", opt_num(listing.bedrooms));
            let zone_str = format!("{:>4}", opt_num(listing.zone));
            let travel_str = format!("{:>6}", opt_num(listing.travel_time_to_zone1.map(|t| t as i64)));
            let epc_str = format!("{:>3}", listing.epc.as_deref().unwrap_or("-"));

            let address = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_address(listing.label(), width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_address(listing.label(), 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                listing.label().to_string()
            };

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}  {}  {}  {}",
                    index_str.dimmed(),
                    score_str.bold(),
                    price_str.green(),
                    beds_str,
                    zone_str,
                    travel_str,
                    epc_str.cyan(),
                    address
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}  {}  {}  {}",
                    index_str, score_str, price_str, beds_str, zone_str, travel_str, epc_str,
                    address
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single listing with detailed multi-line output (for verbose mode)
pub fn format_listing_detail(entry: &ScoredListing, use_colors: bool) -> String {
    let listing = &entry.listing;
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!("{}", listing.label().bold()));
    } else {
        lines.push(listing.label().to_string());
    }

    lines.push(format!("  Score: {}", format_score(entry.score())));
    if entry.result.breakdown.gated {
        lines.push("  Gated: fails a hard constraint".to_string());
    } else {
        for factor in &entry.result.breakdown.factors {
            lines.push(format!(
                "  {:<11} {:.2} x {:.2} = {:+.3}",
                factor.label, factor.value, factor.weight, factor.weighted
            ));
        }
    }

    lines.push(format!("  Price: {}", format_price(listing.price)));
    lines.push(format!(
        "  Beds: {}  Tenure: {}  Zone: {}  Travel: {} min  EPC: {}",
        opt_num(listing.bedrooms),
        listing.tenure.as_deref().unwrap_or("-"),
        opt_num(listing.zone),
        opt_num(listing.travel_time_to_zone1.map(|t| t as i64)),
        listing.epc.as_deref().unwrap_or("-"),
    ));
    if let Some(url) = listing.url.as_deref() {
        if use_colors {
            lines.push(format!("  URL: {}", url.underline()));
        } else {
            lines.push(format!("  URL: {}", url));
        }
    }

    lines.join("\n")
}

/// Format listings as tab-separated values for scripting
/// Columns: score, address, price, bedrooms, tenure, zone, travel, epc, url
/// (no headers, no colors)
pub fn format_tsv(entries: &[ScoredListing]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    entries
        .iter()
        .map(|entry| {
            let listing = &entry.listing;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                format_score(entry.score()),
                listing.label(),
                opt_num(listing.price.map(|p| p.round() as i64)),
                opt_num(listing.bedrooms),
                listing.tenure.as_deref().unwrap_or(""),
                opt_num(listing.zone),
                opt_num(listing.travel_time_to_zone1.map(|t| t as i64)),
                listing.epc.as_deref().unwrap_or(""),
                listing.url.as_deref().unwrap_or(""),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an enrichment report for the locate command. The plain block is
/// meant to be pasted into the catalog notes; `--json` covers the rest.
pub fn format_enrichment_report(
    report: &EnrichmentReport,
    reference_label: &str,
    use_colors: bool,
) -> String {
    let station = report.nearest_tube.as_deref().unwrap_or("-");
    let station_dist = report
        .nearest_tube_distance_km
        .map(|d| format!("{:.2}", d))
        .unwrap_or_else(|| "-".to_string());

    if use_colors {
        format!(
            "{}\n  Nearest Tube: {} ({} km)\n  Distance to {}: {} km",
            report.geocoded_address.bold(),
            station.cyan(),
            station_dist,
            reference_label,
            format!("{:.2}", report.distance_to_bank_km).bold()
        )
    } else {
        format!(
            "{}\n  Nearest Tube: {} ({} km)\n  Distance to {}: {} km",
            report.geocoded_address,
            station,
            station_dist,
            reference_label,
            format!("{:.2}", report.distance_to_bank_km)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::Listing;
    use crate::scoring::{compute_score, ScoringConfig};

    fn sample_entry() -> ScoredListing {
        let listing = Listing {
            address: Some("12 Example Road, E8".to_string()),
            url: Some("https://example.com/flat-1".to_string()),
            bedrooms: Some(2),
            tenure: Some("Freehold".to_string()),
            price: Some(380_000.0),
            zone: Some(2),
            travel_time_to_zone1: Some(25.0),
            epc: Some("B".to_string()),
            ..Default::default()
        };
        let result = compute_score(&listing, &ScoringConfig::suggested());
        ScoredListing { listing, result }
    }

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(Some(380_000.0)), "£380,000");
        assert_eq!(format_price(Some(1_250_000.0)), "£1,250,000");
        assert_eq!(format_price(Some(999.0)), "£999");
        assert_eq!(format_price(None), "-");
    }

    #[test]
    fn test_format_score_one_decimal() {
        assert_eq!(format_score(7.9), "7.9");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(10.0), "10.0");
    }

    #[test]
    fn test_format_scored_table_empty() {
        let result = format_scored_table(&[], false);
        assert_eq!(result, "No listings found.");
    }

    #[test]
    fn test_format_scored_table_single() {
        let entries = vec![sample_entry()];
        let result = format_scored_table(&entries, false);
        assert!(result.contains(" 1."));
        assert!(result.contains("£380,000"));
        assert!(result.contains("12 Example Road, E8"));
    }

    #[test]
    fn test_format_scored_table_indices_sequential() {
        let entries = vec![sample_entry(), sample_entry(), sample_entry()];
        let result = format_scored_table(&entries, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(" 1."));
        assert!(lines[1].contains(" 2."));
        assert!(lines[2].contains(" 3."));
    }

    #[test]
    fn test_format_listing_detail_includes_breakdown() {
        let result = format_listing_detail(&sample_entry(), false);
        assert!(result.contains("12 Example Road, E8"));
        assert!(result.contains("Score:"));
        assert!(result.contains("Price"));
        assert!(result.contains("Subjective"));
        assert!(result.contains("URL: https://example.com/flat-1"));
    }

    #[test]
    fn test_format_listing_detail_gated() {
        let listing = Listing {
            address: Some("1 Tiny Studio".to_string()),
            bedrooms: Some(0),
            tenure: Some("Freehold".to_string()),
            ..Default::default()
        };
        let result = compute_score(&listing, &ScoringConfig::suggested());
        let detail = format_listing_detail(&ScoredListing { listing, result }, false);
        assert!(detail.contains("Gated"));
    }

    #[test]
    fn test_format_tsv() {
        let entries = vec![sample_entry()];
        let result = format_tsv(&entries);
        let fields: Vec<&str> = result.split('\t').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[1], "12 Example Road, E8");
        assert_eq!(fields[2], "380000");
        assert_eq!(fields[4], "Freehold");
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_truncate_address() {
        assert_eq!(truncate_address("Short", 20), "Short");
        assert_eq!(
            truncate_address("A very long address somewhere in London", 15),
            "A very long ..."
        );
        assert_eq!(truncate_address("Hello", 3), "Hel");
    }

    #[test]
    fn test_format_enrichment_report() {
        let report = EnrichmentReport {
            geocoded_address: "12 Example Road, Hackney, London".to_string(),
            lat: 51.54,
            lon: -0.05,
            nearest_tube: Some("Bethnal Green".to_string()),
            nearest_tube_distance_km: Some(0.82),
            distance_to_bank_km: 4.5,
        };
        let text = format_enrichment_report(&report, "Bank", false);
        assert!(text.contains("Bethnal Green"));
        assert!(text.contains("0.82"));
        assert!(text.contains("Distance to Bank: 4.50 km"));
    }
}
