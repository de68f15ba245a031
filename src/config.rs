//! Site configuration module.
//!
//! Handles loading, validating, and layering the site configuration. Values are
//! resolved in this order, later layers winning:
//!
//! ```text
//! stock defaults  →  config.toml  →  environment  →  CLI flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! base_url = "https://unbelong-api.belong2jazz.workers.dev"
//!
//! [images]
//! domain = "img.unbelong.xyz"   # Image CDN host
//!
//! [site]
//! name = "unbelong"
//! title = "unbelong - イラストギャラリー"
//! description = "オリジナルイラスト作品を展示するギャラリーサイト"
//! url = "https://illust.unbelong.xyz"   # Public origin, used in sitemap and share links
//! comic_url = "https://unbelong-comic.pages.dev"
//! utc_offset_hours = 9          # Timezone used when rendering dates
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111827"
//! ...
//! ```
//!
//! ## Environment
//!
//! - `ILLUST_GAL_API_URL` overrides `api.base_url`
//! - `ILLUST_GAL_IMAGE_DOMAIN` overrides `images.domain`
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

pub const ENV_API_URL: &str = "ILLUST_GAL_API_URL";
pub const ENV_IMAGE_DOMAIN: &str = "ILLUST_GAL_IMAGE_DOMAIN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Remote API connection.
    pub api: ApiConfig,
    /// Image CDN settings.
    pub images: ImagesConfig,
    /// Site identity and public URLs.
    pub site: SiteMeta,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate that URLs parse and the CDN domain is a bare host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("api.base_url", &self.api.base_url)?;
        check_http_url("site.url", &self.site.url)?;
        check_http_url("site.comic_url", &self.site.comic_url)?;
        let domain = self.images.domain.trim();
        if domain.is_empty() {
            return Err(ConfigError::Validation(
                "images.domain must not be empty".into(),
            ));
        }
        if domain.contains("://") || domain.contains('/') {
            return Err(ConfigError::Validation(format!(
                "images.domain must be a host name, got '{domain}'"
            )));
        }
        if !(-23..=23).contains(&self.site.utc_offset_hours) {
            return Err(ConfigError::Validation(
                "site.utc_offset_hours must be between -23 and 23".into(),
            ));
        }
        Ok(())
    }

    /// Apply `ILLUST_GAL_*` environment overrides using `lookup`.
    ///
    /// Takes a lookup function instead of reading the process environment so
    /// tests can supply their own values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(domain) = lookup(ENV_IMAGE_DOMAIN).filter(|v| !v.trim().is_empty()) {
            self.images.domain = domain;
        }
    }

    /// Site origin without a trailing slash.
    pub fn site_origin(&self) -> &str {
        self.site.url.trim_end_matches('/')
    }
}

fn check_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{key} is not a valid URL: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{key} must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(())
}

/// Remote API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://unbelong-api.belong2jazz.workers.dev".to_string(),
        }
    }
}

/// Image CDN settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Host name of the image CDN (no scheme, no path).
    pub domain: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            domain: "img.unbelong.xyz".to_string(),
        }
    }
}

/// Site identity and public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Short name shown as the logo and in the footer.
    pub name: String,
    /// Document title of the gallery page, also the default OG title.
    pub title: String,
    /// Default meta description.
    pub description: String,
    /// Public origin of the generated site.
    pub url: String,
    /// External link to the companion comic site.
    pub comic_url: String,
    /// UTC offset used for every rendered date.
    pub utc_offset_hours: i32,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            name: "unbelong".to_string(),
            title: "unbelong - イラストギャラリー".to_string(),
            description: "オリジナルイラスト作品を展示するギャラリーサイト".to_string(),
            url: "https://illust.unbelong.xyz".to_string(),
            comic_url: "https://unbelong-comic.pages.dev".to_string(),
            utc_offset_hours: 9,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Card and panel surfaces.
    pub surface: String,
    pub text: String,
    /// Secondary text (meta lines, footer, captions).
    pub text_muted: String,
    pub border: String,
    /// Accent used for the logo, links, and tag chips.
    pub accent: String,
    pub accent_soft: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f9fafb".to_string(),
            text: "#111827".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            accent: "#0284c7".to_string(),
            accent_soft: "#e0f2fe".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#171717".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#9ca3af".to_string(),
            border: "#333333".to_string(),
            accent: "#38bdf8".to_string(),
            accent_soft: "#0c4a6e".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults and deserialize.
///
/// Validation is left to the caller so environment and CLI overrides can be
/// applied first.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    Ok(config)
}

/// Load config from a `config.toml` path, falling back to stock defaults when
/// the file is absent, then apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with environment variables read through `lookup`.
pub fn load_config_with<F>(path: &Path, lookup: F) -> Result<SiteConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = resolve_config(load_raw_config(path)?)?;
    config.apply_env(lookup);
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# illust-gal configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Environment overrides (applied after this file):
#   ILLUST_GAL_API_URL       -> api.base_url
#   ILLUST_GAL_IMAGE_DOMAIN  -> images.domain

# ---------------------------------------------------------------------------
# Remote API
# ---------------------------------------------------------------------------
[api]
# Base URL of the gallery API. Endpoints used:
#   GET /illustrations?status=published
#   GET /illustrations/slug/<slug>
#   GET /author
base_url = "https://unbelong-api.belong2jazz.workers.dev"

# ---------------------------------------------------------------------------
# Image CDN
# ---------------------------------------------------------------------------
[images]
# Host serving https://<domain>/<image_id>/<variant>
domain = "img.unbelong.xyz"

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
name = "unbelong"
title = "unbelong - イラストギャラリー"
description = "オリジナルイラスト作品を展示するギャラリーサイト"

# Public origin of the deployed site (sitemap and share links).
url = "https://illust.unbelong.xyz"

# External link shown in the header and footer navigation.
comic_url = "https://unbelong-comic.pages.dev"

# Dates are rendered at this UTC offset, independent of the build machine.
utc_offset_hours = 9

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f9fafb"
text = "#111827"
text_muted = "#6b7280"
border = "#e5e7eb"
accent = "#0284c7"
accent_soft = "#e0f2fe"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#171717"
text = "#eeeeee"
text_muted = "#9ca3af"
border = "#333333"
accent = "#38bdf8"
accent_soft = "#0c4a6e"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("bg", &scheme.background),
            ("surface", &scheme.surface),
            ("text", &scheme.text),
            ("text-muted", &scheme.text_muted),
            ("border", &scheme.border),
            ("accent", &scheme.accent),
            ("accent-soft", &scheme.accent_soft),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}--color-{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{light}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}\n    }}\n}}",
        light = vars(&colors.light, "    "),
        dark = vars(&colors.dark, "        "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = SiteConfig::default();
        config.validate().unwrap();
        assert_eq!(config.images.domain, "img.unbelong.xyz");
        assert_eq!(config.site.utc_offset_hours, 9);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[images]
domain = "cdn.example.com"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.images.domain, "cdn.example.com");
        // Default values preserved
        assert_eq!(config.site.name, "unbelong");
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r##"
[site]
nmae = "typo"
"##;
        assert!(toml::from_str::<SiteConfig>(toml).is_err());
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.colors.dark.accent, defaults.colors.dark.accent);
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
        assert!(css.contains("prefers-color-scheme: dark"));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_overrides_nested_keys_only() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors.dark]
accent = "#ff00ff"
"##,
        )
        .unwrap();
        let config: SiteConfig = merge_toml(base, overlay).try_into().unwrap();
        assert_eq!(config.colors.dark.accent, "#ff00ff");
        assert_eq!(config.colors.dark.background, "#0a0a0a");
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn rejects_bad_api_url() {
        let mut config = SiteConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let mut config = SiteConfig::default();
        config.site.url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.url"));
    }

    #[test]
    fn rejects_domain_with_scheme() {
        let mut config = SiteConfig::default();
        config.images.domain = "https://img.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let mut config = SiteConfig::default();
        config.site.utc_offset_hours = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn site_origin_trims_trailing_slash() {
        let mut config = SiteConfig::default();
        config.site.url = "https://example.com/".to_string();
        assert_eq!(config.site_origin(), "https://example.com");
    }

    // =========================================================================
    // environment overrides
    // =========================================================================

    #[test]
    fn env_overrides_api_and_domain() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://127.0.0.1:9999"),
            (ENV_IMAGE_DOMAIN, "cdn.local"),
        ]
        .into_iter()
        .collect();
        let mut config = SiteConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.images.domain, "cdn.local");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = SiteConfig::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config.images.domain, "img.unbelong.xyz");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_with(&tmp.path().join("config.toml"), no_env).unwrap();
        assert_eq!(config.site.url, "https://illust.unbelong.xyz");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            r##"
[site]
name = "sketchbook"
utc_offset_hours = 0

[colors.light]
accent = "#123456"
"##,
        )
        .unwrap();

        let config = load_config_with(&config_path, no_env).unwrap();
        assert_eq!(config.site.name, "sketchbook");
        assert_eq!(config.site.utc_offset_hours, 0);
        assert_eq!(config.colors.light.accent, "#123456");
        // Unspecified values should be defaults
        assert_eq!(config.colors.light.background, "#ffffff");
    }

    #[test]
    fn load_config_env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            "[api]\nbase_url = \"https://file.example.com/api\"\n",
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://env.example.com/api"),
            (ENV_IMAGE_DOMAIN, "cdn.example.com"),
        ]
        .into_iter()
        .collect();

        let config =
            load_config_with(&config_path, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com/api");
        assert_eq!(config.images.domain, "cdn.example.com");
    }

    #[test]
    fn load_config_validates_after_env() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_with(&tmp.path().join("config.toml"), |key| {
            (key == ENV_IMAGE_DOMAIN).then(|| "https://cdn.example.com/".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "this is not valid toml [[[").unwrap();
        assert!(matches!(
            load_config_with(&config_path, no_env),
            Err(ConfigError::Toml(_))
        ));
    }
}
