//! Data models for section digests and their normalized representations.
//!
//! This module defines the two shapes an article takes on its way to the page:
//! - [`RawSourceRecord`]: one entry of a section digest as written by the export job
//! - [`Article`]: the strictly-typed, display-ready record everything else works with
//!
//! The export job is loosely schematized, so every raw field is optional and
//! tolerant of the wrong JSON type. The loose shape stops here: [`Article::from_raw`]
//! is total and is the only way raw records leave this module.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title used when a record has no usable title.
pub const PLACEHOLDER_TITLE: &str = "(no title)";

/// Outlet label used when a record carries no section label.
pub const DEFAULT_OUTLET: &str = "Naver";

/// A single digest entry as produced by the export job.
///
/// Every field is "present or absent". Text fields accept strings, and also
/// numbers or booleans (kept as their JSON text); counts accept non-negative
/// numbers only. Anything else is treated as absent rather than rejected.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct RawSourceRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub views: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub comments: Option<u64>,
    /// Publish timestamp, kept as text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
}

impl RawSourceRecord {
    /// Interpret one element of a digest array.
    ///
    /// Objects are read field by field; any other JSON value yields a record
    /// with every field absent, which normalizes to a placeholder article.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// A display-ready article.
///
/// `title` is never empty. `published_at`, `content` and `url` may be empty;
/// an empty `published_at` means the date is left off the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub outlet: String,
    pub views: u64,
    pub comments: u64,
    pub published_at: String,
    pub content: String,
    pub url: String,
}

impl Article {
    /// Normalize a raw record field by field.
    pub fn from_raw(raw: RawSourceRecord) -> Self {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
        let outlet = raw
            .section
            .filter(|s| !s.is_empty())
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| DEFAULT_OUTLET.to_string());

        Article {
            title,
            outlet,
            views: raw.views.unwrap_or(0),
            comments: raw.comments.unwrap_or(0),
            published_at: raw.date.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        _ => None,
    })
}
