/*!
 * CodeGatherer - Gather project files into Markdown documents for AI chat context
 *
 * This library concatenates selected files and folders into size-bounded
 * Markdown documents and renders ASCII trees of project directories.
 */

pub mod aggregator;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod packer;
pub mod progress;
pub mod report;
pub mod structure;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use aggregator::Aggregator;
pub use catalog::Catalog;
pub use config::Config;
pub use error::{GathererError, Result};
pub use packer::DocumentPacker;
pub use progress::{GatherProgress, ProgressSink};
pub use report::{GatherReport, ReportFormat, Reporter};
pub use structure::{IgnoreSet, StructureRenderer};
pub use types::{EntryKind, GatherOutcome, WrittenDocument};
pub use writer::OutputWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
