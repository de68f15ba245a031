use clap::{Parser, Subcommand};
use illust_gal::{api::ApiClient, config, format, generate, load, logging, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "illust-gal")]
#[command(about = "Static front end for an illustration gallery API")]
#[command(long_about = "\
Static front end for an illustration gallery API

Fetches published illustrations and the author profile from the API and
writes a static site:

  dist/
  ├── index.html                   # Gallery grid + overlay viewer
  ├── illustrations/<slug>/        # One detail page per illustration
  ├── about/index.html             # Author profile
  ├── 404.html
  └── sitemap.xml

Images are served from the CDN and never copied.

API failures do not fail the build: a missing list renders an empty gallery,
an illustration whose detail is not found gets no page and no links (404.html
answers for it), a missing author renders the about page's not-found state.

Settings come from config.toml (optional), then ILLUST_GAL_API_URL and
ILLUST_GAL_IMAGE_DOMAIN, then the flags below.

Run 'illust-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// API base URL (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Image CDN domain (overrides config and environment)
    #[arg(long, global = true)]
    image_domain: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch from the API and write the static site
    Build,
    /// Fetch from the API and list what a build would render
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    logging::init()?;
    let site_config = resolve_site_config(&cli)?;
    let api = ApiClient::new(&site_config.api.base_url)?;

    match cli.command {
        Command::Build => {
            println!("==> Fetching from {}", api.base_url());
            let data = load::load_site(&api);

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&data, &site_config, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", api.base_url());
            let data = load::load_site(&api);
            let offset = format::offset_from_hours(site_config.site.utc_offset_hours);
            output::print_check_output(&data, offset);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Config file, then environment, then flags; validated again once the flags
/// are applied.
fn resolve_site_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let mut site_config = config::load_config(&cli.config)?;
    if cli.api_url.is_none() && cli.image_domain.is_none() {
        return Ok(site_config);
    }

    if let Some(url) = &cli.api_url {
        site_config.api.base_url = url.clone();
    }
    if let Some(domain) = &cli.image_domain {
        site_config.images.domain = domain.clone();
    }
    site_config.validate()?;
    Ok(site_config)
}
