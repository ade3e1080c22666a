//! Rendered page output.

use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a rendered page to `{output_dir}/{file_name}`, creating the directory
/// if needed. Returns the path written.
#[instrument(level = "info", skip(html), fields(bytes = html.len()))]
pub async fn write_page(
    output_dir: &str,
    file_name: &str,
    html: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(%output_dir, error = %e, "Failed to create page dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir).join(file_name);
    fs::write(&path, html).await?;
    info!(path = %path.display(), "Wrote page");
    Ok(path)
}
