//! Command-line interface definitions for Section Digest.
//!
//! Options can come from flags, environment variables or the YAML config
//! file; flags and environment variables take precedence over the file.

use crate::config::AppConfig;
use crate::sections;
use clap::Parser;

/// Command-line arguments for the Section Digest application.
///
/// # Examples
///
/// ```sh
/// # Load the first section from a local export and write ./public/index.html
/// section_digest -s ./site
///
/// # Build every section page from a deployed dashboard
/// section_digest -s https://news.example.com/dashboard/ --all -o ./public
///
/// # Press section "buttons" by typing ids on stdin
/// section_digest -s ./site --interactive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL or directory containing the outputs/ digests
    #[arg(short, long, env = "DIGEST_SOURCE")]
    pub source: Option<String>,

    /// Section to load, or to show first with --interactive (defaults to the first section)
    #[arg(long, conflicts_with = "all")]
    pub section: Option<String>,

    /// Build a page for every section
    #[arg(long)]
    pub all: bool,

    /// Read section ids from stdin, one per line, and keep the page current
    #[arg(long, conflicts_with = "all")]
    pub interactive: bool,

    /// Output directory for rendered pages
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Output directory for JSON snapshots
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "DIGEST_CONFIG")]
    pub config: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header for HTTP sources
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.json_output_dir {
            config.json_output_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }

    /// The section loaded on startup, for both single-section and interactive runs.
    pub fn initial_section(&self) -> String {
        self.section
            .clone()
            .unwrap_or_else(|| sections::first().id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "section_digest",
            "--source",
            "https://example.com/news/",
            "--section",
            "economy",
            "--output-dir",
            "./public",
        ]);

        assert_eq!(cli.source.as_deref(), Some("https://example.com/news/"));
        assert_eq!(cli.section.as_deref(), Some("economy"));
        assert_eq!(cli.output_dir.as_deref(), Some("./public"));
        assert!(!cli.all);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["section_digest", "-s", "/srv/site", "-o", "/tmp/pages", "-j", "/tmp/json"]);

        assert_eq!(cli.source.as_deref(), Some("/srv/site"));
        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/pages"));
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_all_conflicts_with_section() {
        let result = Cli::try_parse_from(["section_digest", "--all", "--section", "politics"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_interactive_starts_on_given_section() {
        let cli = Cli::parse_from(["section_digest", "--interactive", "--section", "economy"]);
        assert!(cli.interactive);
        assert_eq!(cli.initial_section(), "economy");

        let cli = Cli::parse_from(["section_digest", "--interactive"]);
        assert_eq!(cli.initial_section(), "politics");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["section_digest", "--timeout-secs", "4", "-o", "site"]);
        let base = AppConfig {
            source: "https://example.com/".to_string(),
            ..AppConfig::default()
        };

        let config = cli.apply(base);
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.output_dir, "site");
        assert_eq!(config.source, "https://example.com/");
    }
}
