//! # Illust Gal
//!
//! A static front end for an illustration gallery. The illustrations and the
//! author profile live behind a JSON API; `illust-gal build` fetches them once
//! and writes a plain HTML site that can be dropped on any file server. Images
//! are never copied: every `<img>` points at the image CDN.
//!
//! # Pipeline
//!
//! ```text
//! 1. Fetch     API          →  SiteData        (api + load)
//! 2. Generate  SiteData     →  dist/           (generate + sitemap)
//! ```
//!
//! Fetching is fail-open. A request that errors, times out, or answers with
//! `success: false` is logged and becomes empty data; generation then renders
//! the matching empty or not-found state instead of failing the build. Only
//! local problems (bad config, unwritable output) stop a build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | Blocking HTTP client for the four API endpoints |
//! | [`load`] | Fail-open boundary: API results to [`load::SiteData`] |
//! | [`generate`] | Maud page renderers and the output tree |
//! | [`sitemap`] | `sitemap.xml` entries and rendering |
//! | [`viewer`] | Overlay viewer state machine with scroll-lock/key-binding host |
//! | [`image_url`] | CDN URL construction for named and custom variants |
//! | [`format`] | Fail-open JSON field parsing, date and count formatting |
//! | [`config`] | `config.toml` loading, env overrides, validation, color CSS |
//! | [`types`] | API records and the response envelope |
//! | [`output`] | CLI output formatting for check and build |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Static Output
//!
//! Pages are rendered at build time rather than in the browser. The result
//! needs no runtime, works without JavaScript (gallery cards are ordinary
//! links), and gets indexed without a prerender step.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are
//! checked at compile time and every interpolation is escaped, which matters
//! here because titles, tags, and bios all come from the API.
//!
//! ## One Viewer Model, Two Drivers
//!
//! The overlay viewer's rules live in [`viewer::Viewer`]. At build time it
//! decides which navigation controls each pre-rendered slide carries; in the
//! browser `static/site.js` drives the same transitions.

pub mod api;
pub mod config;
pub mod format;
pub mod generate;
pub mod image_url;
pub mod load;
pub mod logging;
pub mod output;
pub mod sitemap;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
