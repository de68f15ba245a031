//! Fetch everything a build needs, degrading failures to empty results.
//!
//! This is the boundary between the API and rendering. Every call goes through
//! here and every failure (network error, undecodable body, `success: false`)
//! is logged and turned into "nothing": an empty list, a missing detail, an
//! absent author. Rendering never sees an error; it sees empty data and shows
//! the matching empty or not-found state.
//!
//! Each call is attempted once.

use crate::api::{ApiClient, ApiError};
use crate::types::{ApiResponse, AuthorProfile, Illustration, Status};

/// Everything the page renderers consume.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// Published illustrations in API order, as returned by the detail
    /// endpoint. Drives the grid, prev/next, and the sitemap.
    pub illustrations: Vec<Illustration>,
    /// Listed slugs whose detail could not be fetched. They get no page and
    /// are not linked; the 404 page answers for them.
    pub missing: Vec<String>,
    pub author: Option<AuthorProfile>,
}

/// Unwrap an API result, logging and discarding anything unsuccessful.
fn settle<T>(what: &str, result: Result<ApiResponse<T>, ApiError>) -> Option<T> {
    match result {
        Ok(envelope) => {
            let failure = (!envelope.success).then(|| envelope.reason().to_string());
            let data = envelope.into_data();
            match (&failure, &data) {
                (Some(reason), _) => tracing::warn!("{what}: API reported failure: {reason}"),
                (None, None) => tracing::warn!("{what}: API reported success without data"),
                (None, Some(_)) => {}
            }
            data
        }
        Err(err) => {
            tracing::error!("{what}: {err}");
            None
        }
    }
}

pub fn published_illustrations(api: &ApiClient) -> Vec<Illustration> {
    settle(
        "list published illustrations",
        api.list_illustrations(Some(Status::Published)),
    )
    .unwrap_or_default()
}

pub fn illustration_by_slug(api: &ApiClient, slug: &str) -> Option<Illustration> {
    settle(
        &format!("fetch illustration '{slug}'"),
        api.get_illustration_by_slug(slug),
    )
}

pub fn author(api: &ApiClient) -> Option<AuthorProfile> {
    settle("fetch author profile", api.get_author())
}

/// Resolve each listed illustration to its detail record with `fetch`,
/// keeping list order. Slugs whose fetch returns nothing are returned
/// separately.
fn resolve_details<F>(listed: Vec<Illustration>, mut fetch: F) -> (Vec<Illustration>, Vec<String>)
where
    F: FnMut(&str) -> Option<Illustration>,
{
    let mut found = Vec::with_capacity(listed.len());
    let mut missing = Vec::new();
    for entry in listed {
        match fetch(&entry.slug) {
            Some(full) => found.push(full),
            None => {
                tracing::warn!(slug = %entry.slug, "illustration not found; leaving it out of the site");
                missing.push(entry.slug);
            }
        }
    }
    (found, missing)
}

/// List published illustrations once, fetch each one's detail, then the
/// author.
pub fn load_site(api: &ApiClient) -> SiteData {
    let listed = published_illustrations(api);
    tracing::info!(count = listed.len(), "loaded illustration list");

    let (illustrations, missing) = resolve_details(listed, |slug| illustration_by_slug(api, slug));

    let author = author(api);
    if author.is_none() {
        tracing::warn!("no author profile; about page will show the not-found state");
    }

    SiteData {
        illustrations,
        missing,
        author,
    }
}
