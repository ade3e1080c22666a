//! JSON snapshot output.
//!
//! Each load can be recorded as the exact list of articles that was shown,
//! together with the status it was shown under. Files are grouped by the
//! local date of the run:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── politics.json
//!     └── it_science.json
//! ```
//!
//! A later run on the same day overwrites the section's file.

use crate::models::Article;
use crate::sections;
use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// What a section showed at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub section: String,
    /// Status line text at the time of the snapshot.
    pub status: String,
    /// RFC 3339 local timestamp.
    pub generated_at: String,
    pub local_date: String,
    pub articles: Vec<Article>,
}

impl Snapshot {
    pub fn new(section: &str, status: &str, articles: Vec<Article>, now: DateTime<Local>) -> Self {
        Self {
            section: section.to_string(),
            status: status.to_string(),
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            local_date: now.date_naive().to_string(),
            articles,
        }
    }
}

/// Write a [`Snapshot`] to `{json_output_dir}/{date}/{section}.json`.
///
/// Only sections from the section table are written; the file name is taken
/// from the table, never from the caller's id.
///
/// # Errors
///
/// Returns an error for an unknown section, or if serialization, directory
/// creation or the write fails.
#[instrument(level = "info", skip_all, fields(%json_output_dir, section = %snapshot.section))]
pub async fn write_snapshot(
    snapshot: &Snapshot,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let Some(section) = sections::resolve(&snapshot.section) else {
        return Err(format!("refusing snapshot for unknown section '{}'", snapshot.section).into());
    };
    let json = serde_json::to_string_pretty(snapshot)?;

    let full_json_dir = PathBuf::from(json_output_dir).join(&snapshot.local_date);
    info!(full_json_dir = %full_json_dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(full_json_dir = %full_json_dir.display(), error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = full_json_dir.join(format!("{}.json", section.id));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = snapshot.articles.len(), "Wrote JSON snapshot");
    Ok(path)
}
