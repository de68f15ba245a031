//! CLI output formatting for the check and build commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every illustration is
//! shown by positional index and title, with slug, dates, and counts as
//! indented context lines. Generated files appear as secondary context after
//! an arrow.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Illustrations
//! 001 Morning Walk
//!     Slug: morning-walk
//!     Published: 2024/1/15
//!     Views: 1,234
//!     Tags: ink, sketch
//!
//! Not found (listed, no detail)
//!     night-city
//!
//! Author
//!     Mika (2 links)
//! ```
//!
//! ## Build
//!
//! ```text
//! Gallery → index.html
//! 001 Morning Walk → illustrations/morning-walk/index.html
//! About → about/index.html
//! Not found → 404.html
//! Sitemap → sitemap.xml
//!
//! Generated 1 illustration page, author found
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::format::{format_count, format_short_date, parse_social_links, parse_tags};
use crate::generate::GenerateReport;
use crate::load::SiteData;
use chrono::FixedOffset;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format what a build would render, from the loaded data.
pub fn format_check_output(data: &SiteData, offset: FixedOffset) -> Vec<String> {
    let mut lines = vec!["Illustrations".to_string()];

    if data.illustrations.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    for (i, ill) in data.illustrations.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), ill.title));
        lines.push(format!("{}Slug: {}", indent(1), ill.slug));
        if let Some(desc) = ill.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("{}Description: {}", indent(1), truncate_desc(desc, 60)));
        }
        if let Some(published) = ill.published_at {
            lines.push(format!(
                "{}Published: {}",
                indent(1),
                format_short_date(published, offset)
            ));
        }
        lines.push(format!("{}Views: {}", indent(1), format_count(ill.view_count)));
        let tags = parse_tags(ill.tags.as_deref());
        if !tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), tags.join(", ")));
        }
    }

    if !data.missing.is_empty() {
        lines.push(String::new());
        lines.push("Not found (listed, no detail)".to_string());
        for slug in &data.missing {
            lines.push(format!("{}{}", indent(1), slug));
        }
    }

    lines.push(String::new());
    lines.push("Author".to_string());
    match &data.author {
        Some(author) => {
            let links = parse_social_links(author.social_links.as_deref());
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                author.name,
                plural(links.entries().len(), "link", "links")
            ));
        }
        None => lines.push(format!("{}(not found)", indent(1))),
    }

    lines
}

pub fn print_check_output(data: &SiteData, offset: FixedOffset) {
    for line in format_check_output(data, offset) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages written by a build.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut detail_index = 0;

    for page in &report.pages {
        if page.path.starts_with("illustrations/") {
            detail_index += 1;
            lines.push(format!(
                "{} {} → {}",
                format_index(detail_index),
                page.label,
                page.path
            ));
        } else {
            lines.push(format!("{} → {}", page.label, page.path));
        }
    }

    for slug in &report.missing_slugs {
        lines.push(format!("{}Not found: {:?} has no detail record", indent(1), slug));
    }
    for slug in &report.skipped_slugs {
        lines.push(format!("{}Skipped: {:?} is not a usable slug", indent(1), slug));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, author {}",
        plural(detail_index, "illustration page", "illustration pages"),
        if report.author_found { "found" } else { "not found" }
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
