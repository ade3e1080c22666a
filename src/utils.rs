//! Small helpers for logging previews, JSON error classification and output directories.

use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

const WRITE_CHECK_FILE: &str = ".section_digest_write_check";

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to the nearest
/// character boundary, with an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Detect if a serde_json error means the input ended early.
///
/// A digest cut off mid-write by the export job fails with an EOF error,
/// which is worth telling apart from plain garbage in the logs.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Create `path` if it is missing and confirm pages can be written into it.
///
/// Writing and removing an empty marker file surfaces permission problems
/// before any section is loaded.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the marker file
/// cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let marker = Path::new(path).join(WRITE_CHECK_FILE);
    fs::write(&marker, b"").await?;
    if let Err(e) = fs::remove_file(&marker).await {
        warn!(marker = %marker.display(), error = %e, "Could not remove write-check file");
    }
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // Each Hangul syllable is three bytes.
        let s = "정치 뉴스";
        let result = truncate_for_log(s, 4);
        assert!(result.starts_with("정…"));
        assert!(result.ends_with("(+10 bytes)"));
    }

    #[test]
    fn test_looks_truncated() {
        let eof = serde_json::from_str::<serde_json::Value>(r#"[{"title": "A"#).unwrap_err();
        assert!(looks_truncated(&eof));

        let syntax = serde_json::from_str::<serde_json::Value>("[1,,2]").unwrap_err();
        assert!(!looks_truncated(&syntax));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public/pages");
        let nested = nested.to_str().unwrap();

        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
        assert!(!Path::new(nested).join(WRITE_CHECK_FILE).exists());
        assert_eq!(std::fs::read_dir(nested).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("public");
        std::fs::write(&file, "not a directory").unwrap();

        assert!(ensure_writable_dir(file.to_str().unwrap()).await.is_err());
    }
}
