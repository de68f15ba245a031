//! End-to-end build against a stub API served by tiny_http.

use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::DateTime;
use illust_gal::api::ApiClient;
use illust_gal::config::SiteConfig;
use illust_gal::generate::generate_at;
use illust_gal::load::load_site;
use illust_gal::output::format_generate_output;

static LIST: &str = include_str!("../fixtures/api/illustrations.json");
static MORNING_WALK: &str = include_str!("../fixtures/api/morning-walk.json");
static AUTHOR: &str = include_str!("../fixtures/api/author.json");
static NOT_FOUND: &str = include_str!("../fixtures/api/not-found.json");

/// `(request url including query, status, body)`
type Route = (&'static str, u16, &'static str);

struct StubApi {
    base_url: String,
    shutdown: mpsc::Sender<()>,
    handle: thread::JoinHandle<Vec<String>>,
}

impl StubApi {
    /// Stop the server and return the URLs it was asked for.
    fn finish(self) -> Vec<String> {
        let _ = self.shutdown.send(());
        self.handle.join().expect("join stub server")
    }
}

fn spawn_api(routes: Vec<Route>) -> StubApi {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base_url = format!("http://{}/api", server.server_addr());
    let (shutdown, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let url = request.url().to_string();
            let (status, body) = routes
                .iter()
                .find(|(path, _, _)| *path == url)
                .map(|(_, status, body)| (*status, *body))
                .unwrap_or((404, NOT_FOUND));
            seen.push(url);

            let header =
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("content-type header");
            let _ = request.respond(
                tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header),
            );
        }
        seen
    });

    StubApi {
        base_url,
        shutdown,
        handle,
    }
}

fn config_for(api: &StubApi) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.api.base_url = api.base_url.clone();
    config.images.domain = "img.test".to_string();
    config.site.url = "https://gallery.test/".to_string();
    config
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("read {relative}: {e}"))
}

fn build(config: &SiteConfig, out: &Path) -> illust_gal::generate::GenerateReport {
    let client = ApiClient::new(&config.api.base_url).expect("api client");
    let data = load_site(&client);
    let now = DateTime::from_timestamp(1_717_200_000, 0).expect("timestamp");
    generate_at(&data, config, out, now).expect("generate")
}

#[test]
fn builds_full_site_from_api() {
    let api = spawn_api(vec![
        ("/api/illustrations?status=published", 200, LIST),
        ("/api/illustrations/slug/morning-walk", 200, MORNING_WALK),
        ("/api/author", 200, AUTHOR),
    ]);
    let config = config_for(&api);
    let out = tempfile::tempdir().expect("tempdir");

    let report = build(&config, out.path());
    let requested = api.finish();

    assert_eq!(
        requested,
        vec![
            "/api/illustrations?status=published",
            "/api/illustrations/slug/morning-walk",
            "/api/illustrations/slug/night-city",
            "/api/author",
        ]
    );
    assert_eq!(report.illustration_count, 1);
    assert_eq!(report.missing_slugs, vec!["night-city".to_string()]);
    assert!(report.author_found);

    let index = read(out.path(), "index.html");
    assert!(index.contains(r#"href="/illustrations/morning-walk" data-index="0""#));
    assert!(!index.contains("/illustrations/night-city"));
    assert!(!index.contains("Night City"));
    assert!(index.contains("https://img.test/img-morning/public?width=600"));
    assert!(index.contains("1,234 回"));
    assert!(index.contains("2024/1/15"));
    assert!(index.contains("© 2024 unbelong"));

    // Fetched detail: markdown rendered, raw HTML escaped, non-string tag dropped.
    let morning = read(out.path(), "illustrations/morning-walk/index.html");
    assert!(morning.contains("<strong>sumi ink</strong>"));
    assert!(morning.contains("<table>"));
    assert!(!morning.contains("<img src=x"));
    assert!(morning.contains(r#"<li class="tag">#ink</li>"#));
    assert!(morning.contains(r#"<li class="tag">#street</li>"#));
    assert!(!morning.contains(r#"<li class="tag">#7</li>"#));
    assert!(morning.contains("2024年1月15日"));
    assert!(!morning.contains(r#"rel="next""#));
    assert!(!morning.contains(r#"rel="prev""#));

    // Detail 404: no page, no links; 404.html answers for it.
    assert!(!out.path().join("illustrations/night-city").exists());

    let about = read(out.path(), "about/index.html");
    assert!(about.contains("Mika Aoyama"));
    assert!(about.contains("<em>ink</em>"));
    assert!(about.contains(r#"class="button twitter""#));
    assert!(about.contains(r#"class="button instagram""#));
    assert!(about.contains(r#"class="button booth" href="https://mika.booth.pm""#));

    let sitemap = read(out.path(), "sitemap.xml");
    assert!(sitemap.contains("<loc>https://gallery.test</loc>"));
    assert!(sitemap.contains("<loc>https://gallery.test/about</loc>"));
    assert!(sitemap.contains("<loc>https://gallery.test/illustrations/morning-walk</loc>"));
    assert!(sitemap.contains("<lastmod>2024-01-15T00:30:00Z</lastmod>"));
    assert!(!sitemap.contains("night-city"));

    assert!(out.path().join("404.html").is_file());

    let lines = format_generate_output(&report);
    assert!(lines.contains(&"001 Morning Walk → illustrations/morning-walk/index.html".to_string()));
}

#[test]
fn unsuccessful_list_renders_empty_site() {
    let api = spawn_api(vec![(
        "/api/illustrations?status=published",
        500,
        r#"{"success": false, "error": "database unavailable"}"#,
    )]);
    let config = config_for(&api);
    let out = tempfile::tempdir().expect("tempdir");

    let report = build(&config, out.path());
    let requested = api.finish();

    assert_eq!(
        requested,
        vec!["/api/illustrations?status=published", "/api/author"]
    );
    assert_eq!(report.illustration_count, 0);
    assert!(!report.author_found);

    let index = read(out.path(), "index.html");
    assert!(index.contains("まだイラストが投稿されていません"));
    assert!(!index.contains(r#"id="viewer""#));

    let about = read(out.path(), "about/index.html");
    assert!(about.contains("作者情報が見つかりません"));

    let sitemap = read(out.path(), "sitemap.xml");
    assert_eq!(sitemap.matches("<url>").count(), 2);
}

#[test]
fn undecodable_body_renders_empty_gallery() {
    let api = spawn_api(vec![
        ("/api/illustrations?status=published", 200, "<html>gateway</html>"),
        ("/api/author", 200, AUTHOR),
    ]);
    let config = config_for(&api);
    let out = tempfile::tempdir().expect("tempdir");

    let report = build(&config, out.path());
    api.finish();

    assert_eq!(report.illustration_count, 0);
    assert!(report.author_found);
    assert!(read(out.path(), "index.html").contains("まだイラストが投稿されていません"));
    assert!(read(out.path(), "about/index.html").contains("Mika Aoyama"));
}

#[test]
fn unreachable_api_still_builds() {
    // Bind and drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let mut config = SiteConfig::default();
    config.api.base_url = format!("http://127.0.0.1:{port}/api");
    let out = tempfile::tempdir().expect("tempdir");

    let report = build(&config, out.path());

    assert_eq!(report.illustration_count, 0);
    assert!(!report.author_found);
    for path in ["index.html", "about/index.html", "404.html", "sitemap.xml"] {
        assert!(out.path().join(path).is_file(), "missing {path}");
    }
}

#[test]
fn fetches_illustration_by_id() {
    let api = spawn_api(vec![("/api/illustrations/ill-1", 200, MORNING_WALK)]);
    let client = ApiClient::new(&api.base_url).expect("api client");

    let found = client.get_illustration("ill-1").expect("request");
    let missing = client.get_illustration("ill 404").expect("request");
    let requested = api.finish();

    let ill = found.into_data().expect("illustration");
    assert_eq!(ill.slug, "morning-walk");
    assert!(!missing.success);
    assert_eq!(missing.reason(), "Not found");
    assert_eq!(
        requested,
        vec!["/api/illustrations/ill-1", "/api/illustrations/ill%20404"]
    );
}

#[test]
fn encoded_slug_is_requested_and_linked() {
    let list = r#"{"success": true, "data": [{
        "id": "ill-7", "work_id": "w", "title": "Dusk 2", "slug": "dusk #2",
        "image_id": "img-dusk", "status": "published",
        "created_at": 1705278600, "updated_at": 1705278600, "published_at": 1705278600
    }]}"#;
    let detail = r#"{"success": true, "data": {
        "id": "ill-7", "work_id": "w", "title": "Dusk 2", "slug": "dusk #2",
        "image_id": "img-dusk", "status": "published",
        "created_at": 1705278600, "updated_at": 1705278600, "published_at": 1705278600
    }}"#;
    let api = spawn_api(vec![
        ("/api/illustrations?status=published", 200, list),
        ("/api/illustrations/slug/dusk%20%232", 200, detail),
    ]);
    let config = config_for(&api);
    let out = tempfile::tempdir().expect("tempdir");

    let report = build(&config, out.path());
    api.finish();

    assert_eq!(report.illustration_count, 1);
    assert!(out.path().join("illustrations/dusk #2/index.html").is_file());
    let index = read(out.path(), "index.html");
    assert!(index.contains(r#"href="/illustrations/dusk%20%232""#));
    let sitemap = read(out.path(), "sitemap.xml");
    assert!(sitemap.contains("<loc>https://gallery.test/illustrations/dusk%20%232</loc>"));
}
