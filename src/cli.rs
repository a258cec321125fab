//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and the config path can also be provided via environment variables.

use clap::{Parser, ValueEnum};

/// How reports and the history are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

/// Command-line arguments.
///
/// Every input (file, `--text`, `--url`) is analyzed in order within one
/// session. With no inputs at all, the article is read from stdin.
///
/// # Examples
///
/// ```sh
/// # Analyze a pasted article
/// news_credibility --text "Última hora: ..."
///
/// # Fetch and analyze two articles, then print the history as JSON
/// news_credibility --url https://example.com/a --url https://example.com/b --format json
///
/// # Heuristics only, no language service needed
/// cat article.txt | news_credibility --heuristics-only
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Files containing article text
    pub files: Vec<String>,

    /// Article text to analyze (repeatable)
    #[arg(short, long)]
    pub text: Vec<String>,

    /// News article URL to fetch and analyze (repeatable)
    #[arg(short, long)]
    pub url: Vec<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "NEWS_CREDIBILITY_CONFIG")]
    pub config: Option<String>,

    /// Language service endpoint
    #[arg(long, env = "AZURE_LANGUAGE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Language service key
    #[arg(long, env = "AZURE_LANGUAGE_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Output format for reports and the history
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Also write every report as a JSON file under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Only run the red-flag detector and classifier (no reports to write)
    #[arg(long, conflicts_with = "json_output_dir")]
    pub heuristics_only: bool,
}

impl Cli {
    pub fn has_inputs(&self) -> bool {
        !(self.files.is_empty() && self.text.is_empty() && self.url.is_empty())
    }
}
