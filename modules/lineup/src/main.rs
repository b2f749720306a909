use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lineup::pipeline::Pipeline;
use lineup::progress::TerminalProgress;
use lineup::renderer::WebshotRenderer;
use lineup::report::{self, HtmlMode};
use lineup::resolver::HttpResolver;
use lineup_common::config::DEFAULT_USER_AGENT;
use lineup_common::{ScanConfig, ScanError};

/// Fetch, classify, and screenshot a list of URLs into a browsable report.
#[derive(Parser, Debug)]
#[command(name = "lineup", version)]
struct Cli {
    /// File with one URL per line.
    urls_file: PathBuf,

    /// Max concurrent fetches in the profile phase.
    #[arg(short, long, default_value_t = 8)]
    concurrency: usize,

    /// Max concurrent engine processes in the screenshot phase.
    #[arg(long, default_value_t = 4)]
    render_concurrency: usize,

    /// User-Agent string for fetches and rendering.
    #[arg(short = 'u', long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Screenshot viewport width in pixels.
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: u32,

    /// Screenshot viewport height in pixels.
    #[arg(short = 'H', long, default_value_t = 800)]
    height: u32,

    /// Path to the rendering engine executable.
    #[arg(short, long, default_value = "webshot")]
    engine: String,

    /// Per-call timeout in milliseconds.
    #[arg(short, long, default_value_t = 10_000)]
    timeout: u64,

    /// Emit a JSON report instead of HTML.
    #[arg(short, long)]
    json: bool,

    /// Output file. HTML defaults to lineup.html; JSON defaults to stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Append to an existing report file instead of writing a fresh one.
    #[arg(short, long)]
    append: Option<PathBuf>,

    /// Validate TLS certificates instead of accepting invalid ones.
    #[arg(long)]
    strict_tls: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("lineup=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = ScanConfig {
        concurrency: cli.concurrency,
        render_concurrency: cli.render_concurrency,
        user_agent: cli.user_agent.clone(),
        viewport_width: cli.width,
        viewport_height: cli.height,
        engine_path: cli.engine.clone(),
        timeout: Duration::from_millis(cli.timeout),
        strict_tls: cli.strict_tls,
    };

    // All startup validation happens here, before any network activity.
    config.validate()?;
    let urls = read_urls(&cli.urls_file)?;
    if let Some(ref append) = cli.append {
        if !append.exists() {
            return Err(ScanError::Config(format!(
                "append file does not exist: {}",
                append.display()
            ))
            .into());
        }
    }

    info!(urls = urls.len(), "Starting scan");

    let resolver = Arc::new(HttpResolver::new(&config)?);
    let renderer = Arc::new(WebshotRenderer::new(&config));
    let pipeline = Pipeline::new(resolver, renderer, config)?;

    let progress = TerminalProgress::new();
    let mut targets = pipeline.run(urls, &progress).await;

    report::checksum_targets(&mut targets);

    if cli.json {
        let json = report::build_json(&targets)?;
        write_report(&cli.out, &cli.append, &json, None)?;
    } else {
        let mode = if cli.append.is_some() {
            HtmlMode::Append
        } else {
            HtmlMode::Fresh
        };
        let html = report::build_html(&targets, mode);
        write_report(&cli.out, &cli.append, &html, Some(PathBuf::from("lineup.html")))?;
    }

    Ok(())
}

/// Read the input file into trimmed, non-blank URLs. An unreadable or
/// empty file is a startup failure.
fn read_urls(path: &PathBuf) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ScanError::Config(format!("cannot read {}: {e}", path.display())))?;
    let urls: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return Err(ScanError::Config(format!("no URLs in {}", path.display())).into());
    }
    Ok(urls)
}

/// Append takes precedence; then the output file; stdout is the fallback
/// unless a default filename is given (HTML reports are not terminal
/// friendly).
fn write_report(
    out: &Option<PathBuf>,
    append: &Option<PathBuf>,
    content: &str,
    default_file: Option<PathBuf>,
) -> Result<()> {
    if let Some(path) = append {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("failed to append to {}", path.display()))?;
        info!(path = %path.display(), "Appended report");
        return Ok(());
    }

    match out.clone().or(default_file) {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            println!("{content}");
        }
    }
    Ok(())
}
