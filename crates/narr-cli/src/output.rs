//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use narr_core::{AnalysisResult, StructureInfo};
use unicode_width::UnicodeWidthStr;

/// Print an analysis result.
pub fn print_analysis(result: &AnalysisResult) {
    let label = if result.metadata.auto_detected { " (auto-detected)" } else { "" };
    println!("{}{}", result.structure.cyan().bold(), label.dimmed());
    println!("{}", result.summary);
    println!();

    for line in result.analysis.lines() {
        println!("  {}", colorize_line(line));
    }

    println!();
    println!(
        "{}: {}  {}: {} ms",
        "Confidence".bold(),
        score_colored(result.metadata.confidence),
        "Time".bold(),
        result.metadata.processing_time_ms
    );
}

/// Print structures as a table.
pub fn print_structures_table(structures: &[StructureInfo]) {
    if structures.is_empty() {
        println!("{}", "No structures registered.".dimmed());
        return;
    }

    let slug_width = structures
        .iter()
        .map(|s| UnicodeWidthStr::width(s.slug.as_str()))
        .max()
        .unwrap_or(0)
        .max(4);

    println!("{}  {:<6} {}", pad_right("Slug", slug_width), "Units", "Name");
    println!("{}", "-".repeat(slug_width + 40));

    for info in structures {
        println!(
            "{}  {:<6} {}",
            pad_right(&info.slug, slug_width).cyan(),
            info.units,
            info.display_name
        );
    }
}

fn colorize_line(line: &str) -> ColoredString {
    let trimmed = line.trim_start();
    if trimmed.starts_with('+') || line.contains(": present") {
        line.green()
    } else if trimmed.starts_with('-') || line.contains(": missing") {
        line.yellow()
    } else if line.ends_with(':') {
        line.bold()
    } else {
        line.normal()
    }
}

fn score_colored(score: f64) -> ColoredString {
    let text = format!("{:.0}%", score * 100.0);
    if score >= 0.75 {
        text.green()
    } else if score >= 0.4 {
        text.yellow()
    } else {
        text.red()
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}
