//! Rendering of classification results.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use feedback_sentiment::ClassificationResult;
use serde::Serialize;
use std::io::Write;

/// Output format for classification results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable blocks
    Text,
    /// One JSON object per line
    Json,
}

/// A result together with the text it describes and when it was produced.
#[derive(Debug, Serialize)]
pub struct ClassificationRecord<'a> {
    pub text: &'a str,
    #[serde(flatten)]
    pub result: &'a ClassificationResult,
    pub analyzed_at: DateTime<Utc>,
}

/// Write one record in the requested format.
pub fn write_record<W: Write>(
    out: &mut W,
    format: OutputFormat,
    record: &ClassificationRecord<'_>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let result = record.result;
            writeln!(out, "Feedback: {}", record.text)?;
            writeln!(out, "   Sentiment: {}", result.sentiment)?;
            writeln!(out, "   Confidence: {:.2}", result.confidence)?;
            writeln!(out, "   Reasoning: {}", result.reasoning)?;
            if !result.success {
                writeln!(out, "   Error: {}", result.error)?;
            }
            writeln!(out, "{}", "-".repeat(60))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedback_sentiment::classify;

    fn render(format: OutputFormat, text: &str) -> String {
        let result = classify(text);
        let record = ClassificationRecord {
            text,
            result: &result,
            analyzed_at: Utc::now(),
        };
        let mut buf = Vec::new();
        write_record(&mut buf, format, &record).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn json_record_is_flat() {
        let line = render(OutputFormat::Json, "Not bad for the price");
        assert!(line.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["text"], "Not bad for the price");
        assert_eq!(value["sentiment"], "POSITIVE");
        assert_eq!(value["confidence"], 0.85);
        assert!(value["analyzed_at"].is_string());
    }

    #[test]
    fn text_block_lists_fields() {
        let block = render(OutputFormat::Text, "I hate it");
        assert!(block.contains("Feedback: I hate it"));
        assert!(block.contains("Sentiment: NEGATIVE"));
        assert!(block.contains("Confidence: 0.90"));
        assert!(!block.contains("Error:"));
    }
}
