//! Section loading: retrieve a digest, normalize it, or fall back to samples.
//!
//! Loading is a single pass with one suspension point (the retrieval):
//!
//! 1. Resolve the section id to its digest location
//! 2. Retrieve the digest from a [`DigestSource`], bypassing caches
//! 3. Parse the body as a JSON array and normalize the first three records
//! 4. On any failure, or an empty digest, substitute the section's sample articles
//!
//! Every failure funnels into the same fallback. The caller only ever sees a
//! list of 0–3 articles and a [`LoadStatus`]; the [`LoadError`] is logged.

use crate::models::{Article, RawSourceRecord};
use crate::sections::{self, MAX_ARTICLES};
use crate::utils::{looks_truncated, truncate_for_log};
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a live digest could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The section id is not in the section table.
    UnknownSection(String),
    /// Transport failure or non-success response.
    Retrieval(String),
    /// The body is not valid JSON or not an array.
    Parse(String),
    /// The digest contained no records.
    Empty,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::UnknownSection(id) => write!(f, "unknown section '{id}'"),
            LoadError::Retrieval(msg) => write!(f, "retrieval failed: {msg}"),
            LoadError::Parse(msg) => write!(f, "malformed digest: {msg}"),
            LoadError::Empty => write!(f, "digest is empty"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Human-readable load state shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Live,
    Fallback,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Loading => "loading…",
            LoadStatus::Live => "loaded from live source",
            LoadStatus::Fallback => "no data found — showing sample data",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one [`SectionLoader::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// At most [`MAX_ARTICLES`] articles, each with a non-empty title.
    pub articles: Vec<Article>,
    /// `Live` or `Fallback`.
    pub status: LoadStatus,
}

/// Anything that can hand back the raw text of a digest location.
///
/// Implementations must not serve cached content: the digests are regenerated
/// out of band and every load must see the latest run.
pub trait DigestSource {
    /// Retrieve the body stored at `location` (e.g. `outputs/politics.json`).
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Digests served over HTTP(S) next to the dashboard.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    /// Build a source rooted at `base` with its own client.
    pub fn new(base: Url, user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_client(base, client))
    }

    /// Build a source rooted at `base` around an existing client.
    pub fn with_client(mut base: Url, client: reqwest::Client) -> Self {
        // Url::join drops the last path segment unless it ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    fn no_cache_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        headers
    }
}

impl DigestSource for HttpSource {
    #[instrument(level = "debug", skip(self), fields(base = %self.base))]
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        let url = self
            .base
            .join(location)
            .map_err(|e| LoadError::Retrieval(format!("bad location '{location}': {e}")))?;

        let response = self
            .client
            .get(url.clone())
            .headers(Self::no_cache_headers())
            .send()
            .await
            .map_err(|e| LoadError::Retrieval(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Retrieval(format!("{url} returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::Retrieval(e.to_string()))?;
        debug!(%url, bytes = body.len(), "Fetched digest");
        Ok(body)
    }
}

/// Digests read straight from the export job's working tree.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DigestSource for FileSource {
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        let path = self.root.join(location);
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Retrieval(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = body.len(), "Read digest");
        Ok(body)
    }
}

/// The source picked from configuration: a URL or a directory.
#[derive(Debug, Clone)]
pub enum Source {
    Http(HttpSource),
    File(FileSource),
}

impl Source {
    /// `http://` and `https://` locations become [`HttpSource`]s, `file://`
    /// URLs and anything that is not a URL become [`FileSource`]s. Other URL
    /// schemes are rejected.
    pub fn from_location(
        location: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(_) => return Ok(Source::File(FileSource::new(location))),
        };
        match url.scheme() {
            "http" | "https" => Ok(Source::Http(HttpSource::new(url, user_agent, timeout)?)),
            "file" => {
                let root = url
                    .to_file_path()
                    .map_err(|_| format!("'{location}' is not a local file path"))?;
                Ok(Source::File(FileSource::new(root)))
            }
            // Windows drive letters ("C:\site") parse as a one-letter scheme.
            scheme if scheme.len() == 1 => Ok(Source::File(FileSource::new(location))),
            scheme => Err(format!("unsupported source scheme '{scheme}' in '{location}'").into()),
        }
    }
}

impl DigestSource for Source {
    async fn fetch(&self, location: &str) -> Result<String, LoadError> {
        match self {
            Source::Http(source) => source.fetch(location).await,
            Source::File(source) => source.fetch(location).await,
        }
    }
}

/// Parse a digest body and normalize its first [`MAX_ARTICLES`] records.
pub fn parse_digest(body: &str) -> Result<Vec<Article>, LoadError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(
            error = %e,
            truncated = looks_truncated(&e),
            body_preview = %truncate_for_log(body, 200),
            "Digest is not valid JSON"
        );
        LoadError::Parse(e.to_string())
    })?;

    let Value::Array(records) = value else {
        return Err(LoadError::Parse("top-level value is not an array".to_string()));
    };

    let articles: Vec<Article> = records
        .into_iter()
        .take(MAX_ARTICLES)
        .map(RawSourceRecord::from_value)
        .map(Article::from_raw)
        .collect();

    if articles.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(articles)
}

/// Loads sections from one [`DigestSource`].
#[derive(Debug, Clone)]
pub struct SectionLoader<S> {
    source: S,
}

impl<S> SectionLoader<S>
where
    S: DigestSource + Sync,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Load up to three articles for `section_id`, falling back to the sample
    /// table on any failure. Never fails; an unknown id yields no articles.
    #[instrument(level = "info", skip(self))]
    pub async fn load(&self, section_id: &str) -> LoadOutcome {
        info!(status = %LoadStatus::Loading, "Loading section");

        match self.load_live(section_id).await {
            Ok(articles) => {
                info!(
                    count = articles.len(),
                    status = %LoadStatus::Live,
                    "Section loaded"
                );
                LoadOutcome {
                    articles,
                    status: LoadStatus::Live,
                }
            }
            Err(e) => {
                let articles = sections::sample_articles(section_id);
                warn!(
                    error = %e,
                    samples = articles.len(),
                    status = %LoadStatus::Fallback,
                    "Falling back to sample data"
                );
                LoadOutcome {
                    articles,
                    status: LoadStatus::Fallback,
                }
            }
        }
    }

    async fn load_live(&self, section_id: &str) -> Result<Vec<Article>, LoadError> {
        let section = sections::resolve(section_id)
            .ok_or_else(|| LoadError::UnknownSection(section_id.to_string()))?;
        let body = self.source.fetch(section.location).await?;
        parse_digest(&body)
    }
}
