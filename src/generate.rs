//! HTML site generation.
//!
//! Takes the data gathered by [`crate::load`] and writes the final static
//! site.
//!
//! ## Generated Pages
//!
//! - **Gallery** (`/index.html`): card grid of published illustrations plus a
//!   pre-rendered overlay viewer driven by `static/site.js`
//! - **Detail pages** (`/illustrations/{slug}/index.html`): full image, tags,
//!   markdown notes, previous/next links, share links
//! - **About page** (`/about/index.html`): author profile, or a not-found
//!   state when the API had no author
//! - **Not found** (`/404.html`)
//! - **Sitemap** (`/sitemap.xml`)
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── sitemap.xml
//! ├── about/
//! │   └── index.html
//! └── illustrations/
//!     ├── morning-walk/
//!     │   └── index.html
//!     └── ...
//! ```
//!
//! Images are not copied: every `<img>` points at the CDN through
//! [`ImageUrls`].
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into each page:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/site.js`: Viewer overlay and native share button
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. Markdown
//! (illustration notes, author bio) goes through pulldown-cmark with raw HTML
//! demoted to text.

use crate::config::{self, SiteConfig};
use crate::format::{self, format_count, format_date, format_short_date, parse_social_links, parse_tags};
use crate::image_url::ImageUrls;
use crate::load::SiteData;
use crate::sitemap::{self, illustration_path};
use crate::types::{AuthorProfile, Illustration};
use crate::viewer::{NoopHost, Viewer};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::form_urlencoded;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Grid thumbnails are requested at this width from the CDN.
const CARD_IMAGE_WIDTH: u32 = 600;
/// Previous/next thumbnails on detail pages.
const PAGER_IMAGE_WIDTH: u32 = 160;

/// One file written by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub label: String,
    /// Path relative to the output directory.
    pub path: String,
}

/// Summary of a generate run, consumed by [`crate::output`].
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    /// Slugs that could not be used as a directory name.
    pub skipped_slugs: Vec<String>,
    /// Listed slugs whose detail was not found.
    pub missing_slugs: Vec<String>,
    /// Illustrations that got a detail page.
    pub illustration_count: usize,
    pub author_found: bool,
}

/// Shared rendering state: config, CDN resolver, date offset, and the final
/// stylesheet.
pub struct Renderer<'a> {
    config: &'a SiteConfig,
    urls: ImageUrls,
    offset: FixedOffset,
    css: String,
    year: i32,
}

/// Per-page `<head>` metadata.
struct PageMeta<'a> {
    title: String,
    description: &'a str,
    og_image: Option<String>,
    og_type: &'static str,
}

/// Which header nav entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Gallery,
    About,
    None,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a SiteConfig, year: i32) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        Self {
            config,
            urls: ImageUrls::new(config.images.domain.clone()),
            offset: format::offset_from_hours(config.site.utc_offset_hours),
            css: format!("{color_css}\n\n{CSS_STATIC}"),
            year,
        }
    }

    // ========================================================================
    // HTML Components
    // ========================================================================

    /// Renders the base HTML document structure
    fn base_document(&self, meta: &PageMeta, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="ja" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (meta.title) }
                    meta name="description" content=(meta.description);
                    meta property="og:title" content=(meta.title);
                    meta property="og:description" content=(meta.description);
                    meta property="og:type" content=(meta.og_type);
                    @if let Some(image) = &meta.og_image {
                        meta property="og:image" content=(image);
                    }
                    meta name="twitter:card" content="summary_large_image";
                    meta name="twitter:title" content=(meta.title);
                    meta name="twitter:description" content=(meta.description);
                    @if let Some(image) = &meta.og_image {
                        meta name="twitter:image" content=(image);
                    }
                    style { (PreEscaped(&self.css)) }
                }
                body {
                    (content)
                    script { (PreEscaped(JS)) }
                }
            }
        }
    }

    /// Renders the site header with logo and navigation
    ///
    /// On narrow screens the nav collapses behind a checkbox-driven hamburger,
    /// so menu state lives in the DOM rather than in script.
    fn site_header(&self, current: Section) -> Markup {
        let site = &self.config.site;
        html! {
            header.site-header {
                div.container {
                    a.logo href="/" { (site.name) }
                    input.nav-toggle type="checkbox" id="nav-toggle";
                    label.nav-hamburger for="nav-toggle" aria-label="メニュー" {
                        span.hamburger-line {}
                        span.hamburger-line {}
                        span.hamburger-line {}
                    }
                    nav.site-nav {
                        (self.nav_links(current))
                    }
                }
            }
        }
    }

    fn nav_links(&self, current: Section) -> Markup {
        html! {
            ul {
                li class=[(current == Section::Gallery).then_some("current")] {
                    a href="/" { "イラスト" }
                }
                li {
                    a href=(self.config.site.comic_url) target="_blank" rel="noopener noreferrer" {
                        "マンガ"
                    }
                }
                li class=[(current == Section::About).then_some("current")] {
                    a href="/about" { "About" }
                }
            }
        }
    }

    fn site_footer(&self) -> Markup {
        let site = &self.config.site;
        html! {
            footer.site-footer {
                div.container {
                    div.footer-columns {
                        div {
                            h3 { (site.name) }
                            p { "オリジナルイラスト・マンガを公開するプラットフォーム" }
                        }
                        div {
                            h3 { "ナビゲーション" }
                            (self.nav_links(Section::None))
                        }
                    }
                    p.copyright {
                        "© " (self.year) " " (site.name) ". All rights reserved."
                    }
                }
            }
        }
    }

    /// View count and publish date line shared by cards, slides, and detail
    /// pages.
    fn meta_line(&self, ill: &Illustration, long_date: bool) -> Markup {
        html! {
            div.meta {
                span.views { "👁️ " (format_count(ill.view_count)) " 回" }
                @if let Some(published) = ill.published_at {
                    @let date = if long_date {
                        format_date(published, self.offset)
                    } else {
                        format_short_date(published, self.offset)
                    };
                    time datetime=(iso_date(published)) { "📅 " (date) }
                }
            }
        }
    }

    // ========================================================================
    // Page Renderers
    // ========================================================================

    /// Renders the gallery page: card grid plus the overlay viewer
    pub fn render_gallery(&self, illustrations: &[Illustration]) -> Markup {
        let site = &self.config.site;
        let meta = PageMeta {
            title: site.title.clone(),
            description: &site.description,
            og_image: None,
            og_type: "website",
        };

        let content = html! {
            (self.site_header(Section::Gallery))
            main {
                section.hero {
                    div.container {
                        h1 { "Illustration Gallery" }
                        p { "オリジナルイラスト作品を展示しています" }
                    }
                }
                section.gallery {
                    div.container {
                        @if illustrations.is_empty() {
                            p.empty-state { "まだイラストが投稿されていません" }
                        } @else {
                            div.gallery-grid {
                                @for (index, ill) in illustrations.iter().enumerate() {
                                    (self.gallery_card(index, ill))
                                }
                            }
                        }
                    }
                }
            }
            (self.site_footer())
            @if !illustrations.is_empty() {
                (self.render_viewer(illustrations))
            }
        };

        self.base_document(&meta, content)
    }

    /// A grid card. Links to the detail page; with script enabled the click
    /// opens the viewer at `data-index` instead.
    fn gallery_card(&self, index: usize, ill: &Illustration) -> Markup {
        html! {
            a.card href=(illustration_path(&ill.slug)) data-index=(index) {
                div.card-image {
                    img src=(self.urls.sized(&ill.image_id, CARD_IMAGE_WIDTH)) alt=(ill.title) loading="lazy";
                }
                div.card-body {
                    h2.card-title { (ill.title) }
                    @if let Some(desc) = &ill.description {
                        p.card-description { (desc) }
                    }
                    (self.meta_line(ill, false))
                }
            }
        }
    }

    /// Pre-renders one hidden slide per illustration.
    ///
    /// Each slide carries exactly the controls the viewer model allows at that
    /// position: no "previous" on the first, no "next" on the last.
    fn render_viewer(&self, illustrations: &[Illustration]) -> Markup {
        let mut viewer = Viewer::new(illustrations.len(), NoopHost);
        let slides: Vec<Markup> = illustrations
            .iter()
            .enumerate()
            .map(|(index, ill)| {
                viewer.open(index);
                self.viewer_slide(ill, index, &viewer)
            })
            .collect();
        html! {
            div.viewer id="viewer" hidden role="dialog" aria-modal="true" aria-label="イラストビューア" {
                button.viewer-close type="button" data-action="close" aria-label="閉じる" { "×" }
                @for slide in &slides {
                    (slide)
                }
            }
        }
    }

    fn viewer_slide(&self, ill: &Illustration, index: usize, viewer: &Viewer<NoopHost>) -> Markup {
        html! {
            div.viewer-slide data-index=(index) hidden {
                @if viewer.has_previous() {
                    button.viewer-prev type="button" data-action="previous" aria-label="前の画像" { "‹" }
                }
                @if viewer.has_next() {
                    button.viewer-next type="button" data-action="next" aria-label="次の画像" { "›" }
                }
                div.viewer-content {
                    img src=(self.urls.public(&ill.image_id)) alt=(ill.title) loading="lazy";
                    div.viewer-info {
                        h2 { (ill.title) }
                        @if let Some(desc) = &ill.description {
                            p { (desc) }
                        }
                        (self.meta_line(ill, false))
                        @if let Some(position) = viewer.position() {
                            p.viewer-position {
                                (position)
                                span.viewer-hint { "(← → キーで移動 / ESC で閉じる)" }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Renders an illustration detail page
    pub fn render_illustration_page(
        &self,
        ill: &Illustration,
        prev: Option<&Illustration>,
        next: Option<&Illustration>,
    ) -> Markup {
        let og_image = self
            .urls
            .public(ill.og_image_id.as_deref().unwrap_or(&ill.image_id));
        let meta = PageMeta {
            title: format!("{} | {}", ill.title, self.config.site.name),
            description: ill.description.as_deref().unwrap_or(""),
            og_image: Some(og_image),
            og_type: "article",
        };
        let tags = parse_tags(ill.tags.as_deref());

        let content = html! {
            (self.site_header(Section::None))
            main {
                section.detail-header {
                    div.container.narrow {
                        h1 { (ill.title) }
                        @if let Some(desc) = &ill.description {
                            p.detail-description { (desc) }
                        }
                        (self.meta_line(ill, true))
                    }
                }
                div.container {
                    figure.detail-image {
                        img src=(self.urls.public(&ill.image_id)) alt=(ill.title);
                    }
                    @if !tags.is_empty() {
                        ul.tags {
                            @for tag in &tags {
                                li.tag { "#" (tag) }
                            }
                        }
                    }
                    @if let Some(body) = ill.content.as_deref().filter(|c| !c.trim().is_empty()) {
                        article.prose { (render_markdown(body)) }
                    }
                }
                nav.pager {
                    div.container {
                        div { @if let Some(p) = prev { (self.pager_link(p, false)) } }
                        a.back href="/" { "← ギャラリーに戻る" }
                        div { @if let Some(n) = next { (self.pager_link(n, true)) } }
                    }
                }
                section.share {
                    h3 { "この作品をシェア" }
                    a.button.twitter href=(self.share_url(ill)) target="_blank" rel="noopener noreferrer" {
                        "𝕏でシェア"
                    }
                    " "
                    button.button type="button" data-share=(ill.title) { "シェア" }
                }
            }
            (self.site_footer())
        };

        self.base_document(&meta, content)
    }

    fn pager_link(&self, ill: &Illustration, is_next: bool) -> Markup {
        let thumb = html! {
            img src=(self.urls.sized(&ill.image_id, PAGER_IMAGE_WIDTH)) alt=(ill.title);
        };
        html! {
            a.pager-link.next[is_next].prev[!is_next] href=(illustration_path(&ill.slug)) rel=(if is_next { "next" } else { "prev" }) {
                @if is_next {
                    span {
                        span.pager-label { "次の作品 →" }
                        (ill.title)
                    }
                    (thumb)
                } @else {
                    (thumb)
                    span {
                        span.pager-label { "← 前の作品" }
                        (ill.title)
                    }
                }
            }
        }
    }

    /// Tweet intent for the detail page's public URL.
    fn share_url(&self, ill: &Illustration) -> String {
        let page_url = format!("{}{}", self.config.site_origin(), illustration_path(&ill.slug));
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("text", &ill.title)
            .append_pair("url", &page_url)
            .finish();
        format!("https://twitter.com/intent/tweet?{query}")
    }

    /// Renders the about page, or its not-found state without an author
    pub fn render_about_page(&self, author: Option<&AuthorProfile>) -> Markup {
        let site = &self.config.site;
        let meta = PageMeta {
            title: format!("About | {}", site.name),
            description: "作者プロフィール",
            og_image: author
                .and_then(|a| a.avatar_image_id.as_deref())
                .map(|id| self.urls.public(id)),
            og_type: "profile",
        };

        let Some(author) = author else {
            let content = html! {
                (self.site_header(Section::About))
                main.not-found {
                    p.empty-state { "作者情報が見つかりません" }
                }
                (self.site_footer())
            };
            return self.base_document(&meta, content);
        };

        let links = parse_social_links(author.social_links.as_deref());

        let content = html! {
            (self.site_header(Section::About))
            main {
                section.hero {
                    div.container {
                        h1 { "About" }
                        p { "作者プロフィール" }
                    }
                }
                div.container.narrow {
                    article.profile {
                        div.profile-head {
                            @if let Some(avatar) = &author.avatar_image_id {
                                img.avatar src=(self.urls.public(avatar)) alt=(author.name);
                            }
                            div {
                                h2 { (author.name) }
                                @if !links.is_empty() {
                                    div.social-links {
                                        @for (key, url) in links.entries() {
                                            a class={ "button " (key) } href=(url) target="_blank" rel="noopener noreferrer" {
                                                (social_label(key))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        @if let Some(bio) = author.bio.as_deref().filter(|b| !b.trim().is_empty()) {
                            div.prose { (render_markdown(bio)) }
                        }
                    }
                }
                section.works {
                    div.container.narrow {
                        h3 { "作品を見る" }
                        div.works-grid {
                            a href="/" {
                                h4 { "イラスト" }
                                p { "オリジナルイラスト作品" }
                            }
                            a href=(site.comic_url) target="_blank" rel="noopener noreferrer" {
                                h4 { "マンガ" }
                                p { "オリジナルマンガ作品" }
                            }
                        }
                    }
                }
            }
            (self.site_footer())
        };

        self.base_document(&meta, content)
    }

    /// Renders the 404 page
    pub fn render_not_found(&self) -> Markup {
        let meta = PageMeta {
            title: format!("ページが見つかりません | {}", self.config.site.name),
            description: &self.config.site.description,
            og_image: None,
            og_type: "website",
        };
        let content = html! {
            (self.site_header(Section::None))
            main.not-found {
                h1 { "404" }
                p { "ページが見つかりません" }
                p { "お探しのページは存在しないか、移動した可能性があります。" }
                a.button href="/" { "ホームに戻る" }
            }
            (self.site_footer())
        };
        self.base_document(&meta, content)
    }
}

/// Button label for a social link key; extension keys show as-is.
fn social_label(key: &str) -> &str {
    match key {
        "twitter" => "Twitter/X",
        "instagram" => "Instagram",
        "pixiv" => "Pixiv",
        "blog" => "Blog",
        other => other,
    }
}

fn iso_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Markdown to HTML with tables, strikethrough, and task lists. Raw HTML in
/// the source is rendered as text.
fn render_markdown(source: &str) -> Markup {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

/// Slugs become directory names; reject anything that could leave the
/// `illustrations/` directory.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

fn write_page(output_dir: &Path, relative: &str, contents: &str) -> Result<(), GenerateError> {
    let path = output_dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, contents).map_err(|source| GenerateError::Io { path, source })
}

fn record(report: &mut GenerateReport, label: String, path: &str) {
    tracing::debug!(path, "wrote page");
    report.pages.push(GeneratedPage {
        label,
        path: path.to_string(),
    });
}

/// Write the whole site into `output_dir`.
pub fn generate(
    data: &SiteData,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    generate_at(data, config, output_dir, Utc::now())
}

/// [`generate`] with an explicit clock, for reproducible output.
pub fn generate_at(
    data: &SiteData,
    config: &SiteConfig,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> Result<GenerateReport, GenerateError> {
    let renderer = Renderer::new(config, now.year());
    let mut report = GenerateReport {
        author_found: data.author.is_some(),
        missing_slugs: data.missing.clone(),
        ..GenerateReport::default()
    };
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    // Only illustrations that get a page are linked from anywhere.
    let (list, unsafe_slugs): (Vec<Illustration>, Vec<Illustration>) = data
        .illustrations
        .iter()
        .cloned()
        .partition(|ill| is_safe_slug(&ill.slug));
    for ill in unsafe_slugs {
        tracing::warn!(slug = %ill.slug, "skipping illustration with unusable slug");
        report.skipped_slugs.push(ill.slug);
    }
    report.illustration_count = list.len();

    let gallery = renderer.render_gallery(&list);
    write_page(output_dir, "index.html", &gallery.into_string())?;
    record(&mut report, "Gallery".to_string(), "index.html");

    for (index, ill) in list.iter().enumerate() {
        let prev = index.checked_sub(1).and_then(|i| list.get(i));
        let next = list.get(index + 1);

        let page = renderer.render_illustration_page(ill, prev, next);
        let path = format!("illustrations/{}/index.html", ill.slug);
        write_page(output_dir, &path, &page.into_string())?;
        record(&mut report, ill.title.clone(), &path);
    }

    let about = renderer.render_about_page(data.author.as_ref());
    write_page(output_dir, "about/index.html", &about.into_string())?;
    record(&mut report, "About".to_string(), "about/index.html");

    let not_found = renderer.render_not_found();
    write_page(output_dir, "404.html", &not_found.into_string())?;
    record(&mut report, "Not found".to_string(), "404.html");

    let entries = sitemap::entries(config.site_origin(), &list, now);
    write_page(output_dir, "sitemap.xml", &sitemap::render_sitemap(&entries))?;
    record(&mut report, "Sitemap".to_string(), "sitemap.xml");

    tracing::info!(pages = report.pages.len(), dir = %output_dir.display(), "site generated");
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
