//! Turning load results into files under the output directories.
//!
//! Three entry points, one per run mode: [`build_all_sections`] for `--all`,
//! [`select_and_publish`] for a single selection (used once for `--section`
//! and once per press in `--interactive`), and [`publish`] underneath both.

use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::loader::{DigestSource, LoadStatus, SectionLoader};
use crate::models::Article;
use crate::outputs::json::Snapshot;
use crate::outputs::{html, json};
use crate::render::{Page, render_cards, render_page};
use crate::sections;
use chrono::{Local, SecondsFormat};
use futures::stream::{self, StreamExt};
use std::error::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

pub const INDEX_PAGE: &str = "index.html";

/// Render a section's page to every name in `file_names` and, if configured,
/// record a JSON snapshot of what was shown.
///
/// Ids outside the section table get a page (with no cards) but never a
/// snapshot.
#[instrument(level = "info", skip(config, articles, cards))]
pub async fn publish(
    config: &AppConfig,
    section_id: &str,
    status: LoadStatus,
    articles: &[Article],
    cards: &str,
    file_names: &[&str],
) -> Result<(), Box<dyn Error>> {
    let now = Local::now();
    let generated_at = now.to_rfc3339_opts(SecondsFormat::Secs, false);
    let page = render_page(&Page {
        active: Some(section_id),
        status: status.as_str(),
        cards,
        generated_at: &generated_at,
    });

    for file_name in file_names {
        html::write_page(&config.output_dir, file_name, &page).await?;
    }

    if let Some(json_output_dir) = &config.json_output_dir {
        match sections::resolve(section_id) {
            Some(section) => {
                let snapshot = Snapshot::new(section.id, status.as_str(), articles.to_vec(), now);
                json::write_snapshot(&snapshot, json_output_dir).await?;
            }
            None => debug!(section_id, "No snapshot for unknown section"),
        }
    }
    Ok(())
}

/// Load every section concurrently and write one page per section; the first
/// section also becomes the index page.
#[instrument(level = "info", skip_all)]
pub async fn build_all_sections<S>(
    loader: &SectionLoader<S>,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>>
where
    S: DigestSource + Sync,
{
    let first_id = sections::first().id;

    let results: Vec<(&str, Result<LoadStatus, String>)> = stream::iter(sections::SECTIONS.iter())
        .map(|section| async move {
            let outcome = loader.load(section.id).await;
            let cards = render_cards(&outcome.articles);
            let page_name = format!("{}.html", section.id);
            let mut file_names = vec![page_name.as_str()];
            if section.id == first_id {
                file_names.push(INDEX_PAGE);
            }
            let written = publish(
                config,
                section.id,
                outcome.status,
                &outcome.articles,
                &cards,
                &file_names,
            )
            .await
            .map(|_| outcome.status)
            .map_err(|e| e.to_string());
            (section.id, written)
        })
        .buffer_unordered(sections::SECTIONS.len())
        .collect()
        .await;

    let mut failed = 0usize;
    for (section_id, result) in &results {
        match result {
            Ok(status) => info!(section_id, %status, "Section page written"),
            Err(e) => {
                failed += 1;
                error!(section_id, error = %e, "Failed to write section page");
            }
        }
    }
    let live = results
        .iter()
        .filter(|(_, r)| matches!(r, Ok(LoadStatus::Live)))
        .count();
    info!(
        total = results.len(),
        live,
        fallback = results.len() - live - failed,
        failed,
        "Built all section pages"
    );

    if failed > 0 {
        return Err(format!("{failed} section page(s) could not be written").into());
    }
    Ok(())
}

/// Select a section and, if it is still the latest selection once loaded,
/// write it as the index page.
///
/// `write_lock` serializes page writes; the ticket is checked again after the
/// lock is taken, so a selection superseded while waiting writes nothing.
pub async fn select_and_publish<S>(
    dashboard: &Dashboard<S>,
    write_lock: &Mutex<()>,
    config: &AppConfig,
    section_id: String,
) where
    S: DigestSource + Sync,
{
    let Some(view) = dashboard.select(&section_id).await else {
        return;
    };

    let _guard = write_lock.lock().await;
    if !dashboard.is_current(view.ticket) {
        debug!(ticket = view.ticket, %section_id, "Skipping write for superseded selection");
        return;
    }
    if let Err(e) = publish(
        config,
        &section_id,
        view.status,
        &view.articles,
        &view.cards,
        &[INDEX_PAGE],
    )
    .await
    {
        error!(%section_id, error = %e, "Failed to write page");
    }
}
