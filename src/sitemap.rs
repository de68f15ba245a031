//! `sitemap.xml` generation.
//!
//! Lists the gallery root, the about page, and one entry per published
//! illustration, with change-frequency and priority hints:
//!
//! | Route | changefreq | priority | lastmod |
//! |-------|-----------|----------|---------|
//! | `/` | daily | 1.0 | build time |
//! | `/about` | monthly | 0.8 | build time |
//! | `/illustrations/<slug>` | weekly | 0.9 | `updated_at` |
//!
//! With no illustrations (including when the list fetch failed) the sitemap
//! still carries the two static routes.

use crate::types::Illustration;
use chrono::{DateTime, SecondsFormat, Utc};
use maud::{PreEscaped, html};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Path of an illustration's detail page, relative to the site root.
///
/// The slug is percent-encoded as a single path segment; the directory on
/// disk keeps the raw slug, which is what a static server decodes back to.
pub fn illustration_path(slug: &str) -> String {
    format!("/illustrations/{}", encode_segment(slug))
}

/// Percent-encode one path segment. Only ASCII alphanumerics and `*-._`
/// pass through.
fn encode_segment(segment: &str) -> String {
    // byte_serialize writes a literal '+' as %2B, so every '+' left is a space.
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Build the entries for a site rooted at `origin` (no trailing slash).
pub fn entries(origin: &str, illustrations: &[Illustration], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let mut routes = vec![
        SitemapEntry {
            url: origin.to_string(),
            last_modified: now,
            change_frequency: ChangeFrequency::Daily,
            priority: 1.0,
        },
        SitemapEntry {
            url: format!("{origin}/about"),
            last_modified: now,
            change_frequency: ChangeFrequency::Monthly,
            priority: 0.8,
        },
    ];

    routes.extend(illustrations.iter().map(|ill| SitemapEntry {
        url: format!("{origin}{}", illustration_path(&ill.slug)),
        last_modified: DateTime::from_timestamp(ill.updated_at, 0).unwrap_or(now),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.9,
    }));

    routes
}

/// Render entries as a sitemaps.org `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let body = html! {
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for entry in entries {
                url {
                    loc { (entry.url) }
                    lastmod { (entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)) }
                    changefreq { (entry.change_frequency.as_str()) }
                    priority { (format!("{:.1}", entry.priority)) }
                }
            }
        }
    };
    let doc = html! {
        (PreEscaped(r#"<?xml version="1.0" encoding="UTF-8"?>"#))
        "\n"
        (body)
    };
    doc.into_string()
}
