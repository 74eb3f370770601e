#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use feedback_common::logging::{generate_trace_id, init_logging};
use feedback_common::{Config, Validate};
use feedback_sentiment::{RuleBasedClassifier, SentimentBackend};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod output;

use output::{write_record, ClassificationRecord, OutputFormat};

/// Sample feedback covering each pipeline route.
const DEMO_FEEDBACK: &[&str] = &[
    "The product is very good",
    "The product is not good at all",
    "I love this store!",
    "This is terrible, never buying again",
    "It's okay, nothing special",
    "Not bad for the price",
    "Waste of money, completely useless",
];

/// `feedback-sentiment` - classify short feedback as POSITIVE, NEGATIVE or NEUTRAL.
#[derive(Parser, Debug)]
#[command(name = "feedback-sentiment")]
#[command(version)]
#[command(about = "Rule-based sentiment classification for feedback messages.", long_about = None)]
struct Cli {
    /// Path to a config file (default: ~/.feedback-sentiment/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify feedback given as arguments, or one message per stdin line
    Classify {
        /// Feedback messages; read from stdin when omitted
        texts: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show the full verdict for one message: stage path, features, normalized text
    Explain {
        /// Feedback message
        text: String,
    },

    /// Classify the built-in sample feedback
    Demo {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<feedback_common::Error>()
                .map_or(1, feedback_common::Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_and_validate(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
        config
            .observability
            .validate()
            .map_err(|e| feedback_common::Error::Config(e.to_string()))?;
    }
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    let classifier = RuleBasedClassifier::from_config(&config.classifier);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Classify { texts, format } => {
            let texts = if texts.is_empty() {
                read_stdin_lines()?
            } else {
                texts
            };
            classify_all(&classifier, &texts, format, &mut out)
        }
        Commands::Explain { text } => {
            let verdict = classifier
                .analyze(&text)
                .context("Sentiment rules are unavailable")?;
            serde_json::to_writer_pretty(&mut out, &verdict)?;
            writeln!(out)?;
            Ok(())
        }
        Commands::Demo { format } => classify_all(&classifier, DEMO_FEEDBACK, format, &mut out),
        Commands::Config => {
            writeln!(out, "{}", config.to_pretty_json()?)?;
            Ok(())
        }
    }
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read feedback from stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn classify_all<S, W>(
    classifier: &RuleBasedClassifier,
    texts: &[S],
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    S: AsRef<str> + Sync,
    W: Write,
{
    let trace_id = generate_trace_id();
    let span = tracing::info_span!("classify_batch", %trace_id, backend = classifier.name());
    let _enter = span.enter();

    let results = classifier.classify_batch(texts);
    let analyzed_at = Utc::now();

    let mut failures = 0usize;
    for (text, result) in texts.iter().zip(&results) {
        if !result.success {
            failures += 1;
        }
        let record = ClassificationRecord {
            text: text.as_ref(),
            result,
            analyzed_at,
        };
        write_record(out, format, &record)?;
    }

    tracing::info!(count = results.len(), failures, "Classification finished");
    Ok(())
}
