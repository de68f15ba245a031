//! Image CDN URL construction.
//!
//! Images live on an external CDN addressed by an opaque identifier. A URL is
//! either a named preset:
//!
//! ```text
//! https://<domain>/<image_id>/<variant>
//! ```
//!
//! or the `public` preset with resize parameters in the query string:
//!
//! ```text
//! https://<domain>/<image_id>/public?width=600&fit=cover
//! ```
//!
//! Nothing here touches the network or checks that the identifier exists.

use url::form_urlencoded;

/// Preset used when no variant is given.
pub const DEFAULT_VARIANT: &str = "public";

/// How the CDN fits an image into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    ScaleDown,
    Contain,
    Cover,
    Crop,
    Pad,
}

impl Fit {
    pub fn as_str(self) -> &'static str {
        match self {
            Fit::ScaleDown => "scale-down",
            Fit::Contain => "contain",
            Fit::Cover => "cover",
            Fit::Crop => "crop",
            Fit::Pad => "pad",
        }
    }
}

/// Output encoding requested from the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Auto,
    Webp,
    Avif,
    Json,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Auto => "auto",
            Format::Webp => "webp",
            Format::Avif => "avif",
            Format::Json => "json",
        }
    }
}

/// Ad-hoc resize parameters. Unset fields are left out of the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomVariant {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<Fit>,
    pub quality: Option<u32>,
    pub format: Option<Format>,
}

impl CustomVariant {
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    /// Query pairs in their fixed order. Zero sizes count as unset.
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(w) = self.width.filter(|&w| w > 0) {
            pairs.push(("width", w.to_string()));
        }
        if let Some(h) = self.height.filter(|&h| h > 0) {
            pairs.push(("height", h.to_string()));
        }
        if let Some(fit) = self.fit {
            pairs.push(("fit", fit.as_str().to_string()));
        }
        if let Some(q) = self.quality.filter(|&q| q > 0) {
            pairs.push(("quality", q.to_string()));
        }
        if let Some(format) = self.format {
            pairs.push(("format", format.as_str().to_string()));
        }
        pairs
    }
}

/// Either a preset configured on the CDN or explicit resize parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageVariant {
    Named(String),
    Custom(CustomVariant),
}

impl Default for ImageVariant {
    fn default() -> Self {
        ImageVariant::Named(DEFAULT_VARIANT.to_string())
    }
}

impl From<&str> for ImageVariant {
    fn from(name: &str) -> Self {
        ImageVariant::Named(name.to_string())
    }
}

impl From<CustomVariant> for ImageVariant {
    fn from(custom: CustomVariant) -> Self {
        ImageVariant::Custom(custom)
    }
}

/// Build the CDN URL for an image.
pub fn image_url(image_id: &str, variant: &ImageVariant, domain: &str) -> String {
    match variant {
        ImageVariant::Named(name) => format!("https://{domain}/{image_id}/{name}"),
        ImageVariant::Custom(custom) => {
            let pairs = custom.query_pairs();
            let base = format!("https://{domain}/{image_id}/{DEFAULT_VARIANT}");
            if pairs.is_empty() {
                return base;
            }
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish();
            format!("{base}?{query}")
        }
    }
}

/// URL builder bound to one CDN domain, handed to the page renderers.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    domain: String,
}

impl ImageUrls {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn url(&self, image_id: &str, variant: &ImageVariant) -> String {
        image_url(image_id, variant, &self.domain)
    }

    /// Full-size image through the default preset.
    pub fn public(&self, image_id: &str) -> String {
        self.url(image_id, &ImageVariant::default())
    }

    /// Width-constrained image for grids and thumbnails.
    pub fn sized(&self, image_id: &str, width: u32) -> String {
        self.url(image_id, &CustomVariant::width(width).into())
    }
}
