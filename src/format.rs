//! Display helpers for API fields.
//!
//! Two API fields carry JSON inside a string (`tags`, `social_links`). Both are
//! parsed fail-open: a null, malformed, or wrongly-shaped value renders as
//! "nothing" instead of breaking the page.
//!
//! Timestamps are UNIX seconds and are rendered in Japanese long form
//! (`2024年1月15日`) at a fixed UTC offset taken from the site config, so the
//! output does not depend on the build machine's timezone.

use crate::types::SocialLinks;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde_json::Value;
use url::Url;

/// Parse a JSON-encoded tag array. Non-string elements are dropped.
pub fn parse_tags(tags_json: Option<&str>) -> Vec<String> {
    let Some(raw) = tags_json.filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a JSON-encoded social-links object. Non-string values and anything
/// that is not an absolute `http`/`https` URL are dropped.
pub fn parse_social_links(links_json: Option<&str>) -> SocialLinks {
    let Some(raw) = links_json.filter(|s| !s.is_empty()) else {
        return SocialLinks::default();
    };
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
        return SocialLinks::default();
    };

    let mut links = SocialLinks::default();
    for (key, value) in map {
        let Value::String(url) = value else {
            continue;
        };
        if !is_web_url(&url) {
            continue;
        }
        match key.as_str() {
            "twitter" => links.twitter = Some(url),
            "instagram" => links.instagram = Some(url),
            "pixiv" => links.pixiv = Some(url),
            "blog" => links.blog = Some(url),
            _ => {
                links.extra.insert(key, url);
            }
        }
    }
    links
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw.trim()).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Build a fixed offset from whole hours, clamped to the valid range.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    let hours = hours.clamp(-23, 23);
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

fn localize(timestamp: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(&offset))
}

/// `2024年1月15日`
pub fn format_date(timestamp: i64, offset: FixedOffset) -> String {
    match localize(timestamp, offset) {
        Some(dt) => dt.format("%Y年%-m月%-d日").to_string(),
        None => timestamp.to_string(),
    }
}

/// `2024年1月15日 09:05`
pub fn format_date_time(timestamp: i64, offset: FixedOffset) -> String {
    match localize(timestamp, offset) {
        Some(dt) => dt.format("%Y年%-m月%-d日 %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

/// `2024/1/15`, used on gallery cards.
pub fn format_short_date(timestamp: i64, offset: FixedOffset) -> String {
    match localize(timestamp, offset) {
        Some(dt) => dt.format("%Y/%-m/%-d").to_string(),
        None => timestamp.to_string(),
    }
}

/// Thousands-separated count: `12345` → `12,345`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
