//! # Section Digest
//!
//! Loads the per-section news digests written by the export job, normalizes
//! their loosely-shaped records into display-ready articles, and renders the
//! top three stories of a section as cards on a static dashboard page.
//!
//! ## Usage
//!
//! ```sh
//! section_digest -s https://news.example.com/dashboard/ -o ./public
//! ```
//!
//! ## Architecture
//!
//! Each section selection runs a short pipeline:
//! 1. **Loading**: Fetch `outputs/<section>.json` fresh from the source
//! 2. **Normalizing**: Map the first three records onto [`models::Article`]
//! 3. **Fallback**: Substitute built-in sample articles if anything went wrong
//! 4. **Rendering**: Turn the articles into cards and write the page
//!
//! Overlapping selections (`--interactive`) are resolved last-selection-wins
//! by the [`dashboard::Dashboard`].

use clap::Parser;
use futures::stream::{FuturesUnordered, StreamExt};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dashboard;
mod loader;
mod models;
mod outputs;
mod render;
mod sections;
mod site;
mod utils;

use cli::Cli;
use config::AppConfig;
use dashboard::Dashboard;
use loader::{SectionLoader, Source};
use site::{INDEX_PAGE, build_all_sections, publish, select_and_publish};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("section_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match &args.config {
        Some(path) => AppConfig::load(path).await?,
        None => AppConfig::default(),
    };
    let config = args.apply(config);
    info!(source = %config.source, output_dir = %config.output_dir, "Effective configuration");

    // Early check: ensure the page dir is writable
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let source = Source::from_location(&config.source, &config.user_agent, config.timeout())?;
    let loader = SectionLoader::new(source);

    let section_id = args.initial_section();
    if args.all {
        build_all_sections(&loader, &config).await?;
    } else if args.interactive {
        run_interactive(loader, &config, section_id).await?;
    } else {
        build_selected_section(loader, &config, &section_id).await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Load one section through the dashboard and write it as the index page.
async fn build_selected_section(
    loader: SectionLoader<Source>,
    config: &AppConfig,
    section_id: &str,
) -> Result<(), Box<dyn Error>> {
    if sections::resolve(section_id).is_none() {
        warn!(section_id, "Unknown section; the page will show no cards");
    }
    let dashboard = Dashboard::new(loader);
    if let Some(view) = dashboard.select(section_id).await {
        publish(
            config,
            section_id,
            view.status,
            &view.articles,
            &view.cards,
            &[INDEX_PAGE],
        )
        .await?;
    }
    Ok(())
}

/// Auto-load `initial_section`, then treat each stdin line as a section
/// control being pressed. Presses run concurrently; the index page always
/// ends up showing the latest one.
#[instrument(level = "info", skip(loader, config))]
async fn run_interactive(
    loader: SectionLoader<Source>,
    config: &AppConfig,
    initial_section: String,
) -> Result<(), Box<dyn Error>> {
    if sections::resolve(&initial_section).is_none() {
        warn!(section_id = %initial_section, "Unknown section; the page will show no cards");
    }
    let dashboard = Dashboard::new(loader);
    let write_lock = Mutex::new(());
    let mut pending = FuturesUnordered::new();
    pending.push(select_and_publish(&dashboard, &write_lock, config, initial_section));

    let ids = sections::SECTIONS.iter().map(|s| s.id).collect::<Vec<_>>().join(", ");
    info!(sections = %ids, "Type a section id per line; EOF to quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    let section_id = line.trim();
                    if section_id.is_empty() {
                        continue;
                    }
                    if sections::resolve(section_id).is_none() {
                        warn!(section_id, "Unknown section; the page will show no cards");
                    }
                    pending.push(select_and_publish(
                        &dashboard,
                        &write_lock,
                        config,
                        section_id.to_string(),
                    ));
                }
                None => stdin_open = false,
            },
            Some(()) = pending.next(), if !pending.is_empty() => {}
            else => break,
        }
    }

    let view = dashboard.view();
    info!(
        active = ?view.active,
        status = %view.status,
        cards = view.articles.len(),
        "Interactive session finished"
    );
    Ok(())
}
