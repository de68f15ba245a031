//! Records returned by the gallery API.
//!
//! Everything here is read-only from this crate's point of view: the API owns
//! the lifecycle of illustrations and the author profile, we only decode and
//! render them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication status of an illustration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Published,
    Archived,
}

impl Status {
    /// Value used for the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
            Status::Archived => "archived",
        }
    }
}

/// A single artwork record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Illustration {
    pub id: String,
    pub work_id: String,
    pub title: String,
    /// URL slug, unique among illustrations
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Markdown body shown on the detail page
    #[serde(default)]
    pub content: Option<String>,
    /// CDN image identifier
    pub image_id: String,
    pub status: Status,
    #[serde(default)]
    pub og_image_id: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    /// JSON-encoded array of tag strings
    #[serde(default)]
    pub tags: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub published_at: Option<i64>,
}

/// An illustration joined with the work it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllustrationWithWork {
    #[serde(flatten)]
    pub illustration: Illustration,
    pub work_title: String,
    pub work_slug: String,
}

/// The singleton author record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub id: i64,
    pub name: String,
    /// Markdown
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_image_id: Option<String>,
    /// JSON-encoded object, see [`SocialLinks`]
    #[serde(default)]
    pub social_links: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Social profile URLs keyed by service.
///
/// The four known services get their own fields so the about page can style
/// them; anything else lands in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixiv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SocialLinks {
    pub fn is_empty(&self) -> bool {
        self.twitter.is_none()
            && self.instagram.is_none()
            && self.pixiv.is_none()
            && self.blog.is_none()
            && self.extra.is_empty()
    }

    /// All present links as `(key, url)`: known services first in a fixed
    /// order, then extension keys sorted by name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let known = [
            ("twitter", &self.twitter),
            ("instagram", &self.instagram),
            ("pixiv", &self.pixiv),
            ("blog", &self.blog),
        ];
        known
            .into_iter()
            .filter_map(|(key, url)| url.as_deref().map(|u| (key, u)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .collect()
    }
}

/// The `{success, data, error, message}` wrapper every API call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// The payload, but only when the API reported success.
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }

    /// Best available explanation for a failed envelope.
    pub fn reason(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("no reason given")
    }
}
