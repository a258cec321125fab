//! # news_credibility
//!
//! Command-line front end. One invocation is one analysis session: each
//! input is analyzed in order, its report is printed, and the session
//! history is printed at the end, most recent first.
//!
//! ## Usage
//!
//! ```sh
//! AZURE_LANGUAGE_ENDPOINT=... AZURE_LANGUAGE_KEY=... \
//!   news_credibility --url https://example.com/noticia
//! ```

use clap::Parser;
use std::error::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, OutputFormat};
use news_credibility::analyzer::Analyzer;
use news_credibility::config::AppConfig;
use news_credibility::extractor::{HttpExtractor, TextExtractor};
use news_credibility::heuristics::assess;
use news_credibility::outputs::{json, markdown};
use news_credibility::provider::azure::AzureLanguageClient;
use news_credibility::provider::retry::RetryProvider;
use news_credibility::utils::{ensure_writable_dir, truncate_for_log};

/// Where the text of one input comes from.
#[derive(Debug, Clone)]
enum Source {
    File(String),
    Text(String),
    Url(String),
    Stdin,
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Source::File(path) => format!("file {path}"),
            Source::Text(text) => format!("text \"{}\"", truncate_for_log(text, 40)),
            Source::Url(url) => format!("url {url}"),
            Source::Stdin => "stdin".to_string(),
        }
    }
}

fn collect_sources(args: &Cli) -> Vec<Source> {
    if !args.has_inputs() {
        return vec![Source::Stdin];
    }
    args.files
        .iter()
        .cloned()
        .map(Source::File)
        .chain(args.text.iter().cloned().map(Source::Text))
        .chain(args.url.iter().cloned().map(Source::Url))
        .collect()
}

/// Text of a non-URL source.
async fn read_local(source: &Source) -> Result<String, Box<dyn Error>> {
    match source {
        Source::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        Source::Text(text) => Ok(text.clone()),
        Source::Stdin => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
        Source::Url(url) => Err(format!("{url} must be fetched").into()),
    }
}

#[instrument(level = "info", skip_all, fields(inputs = sources.len()))]
async fn run_heuristics_only(
    sources: &[Source],
    extractor: &HttpExtractor,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let mut verdicts = Vec::new();

    for source in sources {
        let text = match source {
            Source::Url(url) => extractor.extract(url).await.map_err(Box::<dyn Error>::from),
            other => read_local(other).await,
        };
        let text = match text {
            Ok(text) => text,
            Err(e) => {
                error!(source = %source.describe(), error = %e, "Could not read input; skipping");
                continue;
            }
        };

        let verdict = assess(&text);
        info!(source = %source.describe(), classification = %verdict.classification, "Heuristic verdict");
        if format == OutputFormat::Markdown {
            println!("{}", markdown::verdict_to_markdown(&verdict));
        }
        verdicts.push(verdict);
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout carries only the report) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.format, heuristics_only = args.heuristics_only, "Parsed CLI arguments");

    let config = AppConfig::load(args.config.as_deref())?
        .with_credential_overrides(args.endpoint.clone(), args.key.clone());

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    let sources = collect_sources(&args);
    let extractor = HttpExtractor::new(&config.http, &config.extraction)?;

    if args.heuristics_only {
        return run_heuristics_only(&sources, &extractor, args.format).await;
    }

    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "Language service is not configured (use --heuristics-only to skip it)");
            return Err(e.into());
        }
    };
    let client = AzureLanguageClient::new(credentials, &config)?;
    let provider = RetryProvider::new(client, &config.retry);
    let mut analyzer = Analyzer::new(provider, extractor, &config.cache);
    info!(inputs = sources.len(), "Session starting");

    let mut reports = Vec::new();
    for source in &sources {
        let text = match source {
            Source::Url(url) => analyzer.fetch_text(url).await.map_err(Box::<dyn Error>::from),
            other => read_local(other).await,
        };
        let text = match text {
            Ok(text) => text,
            Err(e) => {
                error!(source = %source.describe(), error = %e, "Could not read input; skipping");
                continue;
            }
        };

        let report = match analyzer.analyze(&text).await {
            Ok(report) => report,
            Err(e) => {
                error!(source = %source.describe(), error = %e, "Analysis failed; skipping");
                continue;
            }
        };

        if args.format == OutputFormat::Markdown {
            println!("{}", markdown::report_to_markdown(&report));
        }
        if let Some(dir) = &args.json_output_dir {
            if let Err(e) = json::write_report(&report, reports.len() + 1, dir).await {
                warn!(error = %e, "Failed to write report JSON");
            }
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Markdown => println!("{}", markdown::history_to_markdown(analyzer.history())),
        OutputFormat::Json => println!("{}", json::session_to_json(&reports, analyzer.history())?),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        analyzed = reports.len(),
        failed = sources.len() - reports.len(),
        "Session complete"
    );

    if reports.is_empty() {
        return Err("no input could be analyzed".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_local_sources() {
        let path = std::env::temp_dir().join(format!("news_credibility_input_{}.txt", std::process::id()));
        tokio::fs::write(&path, "Texto desde archivo").await.unwrap();

        let file = Source::File(path.to_string_lossy().to_string());
        assert_eq!(read_local(&file).await.unwrap(), "Texto desde archivo");
        assert_eq!(
            read_local(&Source::Text("pegado".to_string())).await.unwrap(),
            "pegado"
        );
        assert!(read_local(&Source::Url("https://example.com".to_string())).await.is_err());

        let _ = std::fs::remove_file(&path);
    }
}
