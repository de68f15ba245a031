//! Shared test fixtures for the illust-gal test suite.
//!
//! Builders return fully-populated records with predictable values so tests
//! only spell out the fields they care about:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut ill = illustration(2);
//! ill.tags = Some(r#"["ink"]"#.into());
//! assert_eq!(ill.slug, "piece-2");
//! ```

use crate::config::SiteConfig;
use crate::load::SiteData;
use crate::types::{AuthorProfile, Illustration, Status};

/// 2024-01-15T00:30:00Z
pub const BASE_TIMESTAMP: i64 = 1_705_278_600;

/// Published illustration number `n`: slug `piece-n`, image `img-n`.
pub fn illustration(n: u32) -> Illustration {
    let ts = BASE_TIMESTAMP + i64::from(n) * 86_400;
    Illustration {
        id: format!("ill-{n}"),
        work_id: "work-1".to_string(),
        title: format!("Piece {n}"),
        slug: format!("piece-{n}"),
        description: Some(format!("Description of piece {n}")),
        content: None,
        image_id: format!("img-{n}"),
        status: Status::Published,
        og_image_id: None,
        view_count: u64::from(n) * 1000,
        tags: None,
        created_at: ts,
        updated_at: ts,
        published_at: Some(ts),
    }
}

/// `count` published illustrations numbered from 1.
pub fn illustrations(count: u32) -> Vec<Illustration> {
    (1..=count).map(illustration).collect()
}

pub fn author() -> AuthorProfile {
    AuthorProfile {
        id: 1,
        name: "Mika".to_string(),
        bio: Some("Draws **every** day.".to_string()),
        avatar_image_id: Some("avatar-1".to_string()),
        social_links: Some(
            r#"{"twitter": "https://x.com/mika", "pixiv": "https://www.pixiv.net/users/1"}"#
                .to_string(),
        ),
        created_at: BASE_TIMESTAMP,
        updated_at: BASE_TIMESTAMP,
    }
}

/// Site data with `count` illustrations, none missing, and an author.
pub fn site_data(count: u32) -> SiteData {
    SiteData {
        illustrations: illustrations(count),
        missing: Vec::new(),
        author: Some(author()),
    }
}

/// Stock config pointed at a test CDN domain.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.images.domain = "img.test".to_string();
    config.site.url = "https://gallery.test".to_string();
    config
}
