/*!
 * Reporting functionality for codegatherer
 *
 * Summarizes a gather run either as console tables rendered with the
 * tabled library or as JSON.
 */

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use strum::Display;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::types::{GatherOutcome, SectionKind};
use crate::utils::format_file_size;

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Console tables
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Summary of one gather run
#[derive(Debug, Clone, Serialize)]
pub struct GatherReport {
    /// Time taken by the run
    #[serde(serialize_with = "serialize_millis", rename = "duration_ms")]
    pub duration: Duration,
    /// Documents and files produced
    #[serde(flatten)]
    pub outcome: GatherOutcome,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl GatherReport {
    pub fn new(outcome: GatherOutcome, duration: Duration) -> Self {
        Self { duration, outcome }
    }

    /// Total characters across all documents
    pub fn total_chars(&self) -> usize {
        self.outcome.documents.iter().map(|d| d.chars).sum()
    }

    fn count_kind(&self, kind: SectionKind) -> usize {
        self.outcome.files.iter().filter(|f| f.kind == kind).count()
    }
}

/// Report generator for gather runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string for a run
    pub fn generate_report(&self, report: &GatherReport) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &GatherReport) -> Result<()> {
        println!("\n{}", self.generate_report(report)?);
        Ok(())
    }

    // Create a summary table
    fn create_summary_table(&self, report: &GatherReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📄 Files Gathered".to_string(),
                value: self.format_number(report.outcome.files.len()),
            },
            SummaryRow {
                key: "🖼️ Binary Placeholders".to_string(),
                value: self.format_number(report.count_kind(SectionKind::Binary)),
            },
            SummaryRow {
                key: "⚠️ Unreadable Files".to_string(),
                value: self.format_number(report.count_kind(SectionKind::Unreadable)),
            },
            SummaryRow {
                key: "📝 Total Characters".to_string(),
                value: self.format_number(report.total_chars()),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars() / 4)
                ),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create the documents table
    fn create_documents_table(&self, report: &GatherReport) -> String {
        #[derive(Tabled)]
        struct DocumentRow {
            #[tabled(rename = "#")]
            index: usize,

            #[tabled(rename = "Document")]
            path: String,

            #[tabled(rename = "Files")]
            sections: usize,

            #[tabled(rename = "Characters")]
            chars: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        let rows: Vec<DocumentRow> = report
            .outcome
            .documents
            .iter()
            .map(|doc| DocumentRow {
                index: doc.index,
                path: doc.path.display().to_string(),
                sections: doc.sections,
                chars: self.format_number(doc.chars),
                size: format_file_size(doc.bytes),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &GatherReport) -> String {
        let documents_table = self.create_documents_table(report);
        let summary_table = self.create_summary_table(report);

        format!(
            "{}\n{}\n\n{}\n{}",
            "📋  GENERATED DOCUMENTS", documents_table, "✅  GATHERING COMPLETE", summary_table
        )
    }
}
