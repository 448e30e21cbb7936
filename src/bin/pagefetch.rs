use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pagefetch::{FetchConfig, PageClient, Result, build_http_client, output};
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

const DEFAULT_URLS: &[&str] = &[
    "http://www.vienna.at",
    "http://www.vienna.at/schwarzkappler-warnung-fuer-wien-informationen-zu-den-kontrollen/4115696",
    "http://www.vienna.at/bestwerte-im-ersten-halbjahr-wien-ohne-overtourism-problem/5874248",
];

#[derive(Debug, Parser)]
#[command(
    name = "pagefetch",
    about = "Fetch pages sequentially and write each response to a numbered file"
)]
struct Cli {
    /// URLs to fetch, in order. Falls back to the config file, then to the
    /// built-in demo list.
    urls: Vec<String>,

    /// TOML config file. CLI flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the numbered output files are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Connect and read timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Byte budget per response body; larger bodies are trimmed.
    #[arg(long)]
    max_content_bytes: Option<usize>,

    #[arg(long)]
    user_agent: Option<String>,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json_logs: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let fmt_layer = if json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(false).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn load_config(cli: &Cli) -> Result<FetchConfig> {
    let mut config = match &cli.config {
        Some(path) => FetchConfig::from_toml_path(path)?,
        None => FetchConfig::default(),
    };

    if !cli.urls.is_empty() {
        config.urls = cli.urls.clone();
    }
    if config.urls.is_empty() {
        config.urls = DEFAULT_URLS.iter().map(|url| url.to_string()).collect();
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_seconds = secs;
    }
    if let Some(max) = cli.max_content_bytes {
        config.max_content_bytes = max;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("failed to load config: {err}");
            return ExitCode::FAILURE;
        }
    };

    let http = match build_http_client(&config) {
        Ok(http) => http,
        Err(err) => {
            tracing::error!("failed to build http client: {err}");
            return ExitCode::FAILURE;
        }
    };
    let client = PageClient::new(http).with_max_content(config.body_limit());

    let mut failures = 0usize;
    for (index, url) in config.urls.iter().enumerate() {
        match fetch_one(&client, &config, url, index + 1).await {
            Ok(chars) => {
                println!("Fetched output for URL '{url}' with {chars} characters.");
            }
            Err(err) => {
                tracing::error!("fetch failed for {url}: {err}");
                failures += 1;
            }
        }
    }

    if failures == config.urls.len() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn fetch_one(
    client: &PageClient,
    config: &FetchConfig,
    url: &str,
    index: usize,
) -> Result<usize> {
    let page = client.fetch(url).await?;
    if page.body.is_failed() {
        tracing::warn!("body read incomplete for {url}; writing partial output");
    }

    let text = page.text();
    output::write_numbered(&config.output_dir, index, text.as_bytes()).await?;
    Ok(text.chars().count())
}
