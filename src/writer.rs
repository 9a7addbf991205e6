/*!
 * Output file writer for codegatherer
 *
 * Owns the output directory and the run timestamp, so every document of a
 * run shares one timestamp and lands in the same folder.
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{Result, ResultExt};

/// Name of the folder created under the workspace root
pub const OUTPUT_DIR_NAME: &str = "CodeGatherer";

/// Format a timestamp as ISO-8601 with colons replaced by dashes, to the second
pub fn format_run_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Writer for generated documents and structure listings
#[derive(Debug, Clone)]
pub struct OutputWriter {
    /// Directory receiving all artifacts
    output_dir: PathBuf,
    /// Timestamp shared by every artifact of the run
    timestamp: String,
}

impl OutputWriter {
    /// Create a writer for a run starting now
    pub fn new(workspace_root: &Path, dir_name: &str) -> Self {
        Self::with_timestamp(workspace_root, dir_name, format_run_timestamp(Utc::now()))
    }

    /// Create a writer with a fixed timestamp
    pub fn with_timestamp(workspace_root: &Path, dir_name: &str, timestamp: String) -> Self {
        Self {
            output_dir: workspace_root.join(dir_name),
            timestamp,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the aggregation document with the given index
    pub fn document_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("code-analysis-{}-{}.md", self.timestamp, index))
    }

    /// Path of the structure listing for this run
    pub fn structure_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("project-structure-{}.txt", self.timestamp))
    }

    /// Create the output directory if it does not exist yet
    pub fn ensure_output_dir(&self) -> Result<()> {
        if !self.output_dir.is_dir() {
            log::debug!("Creating output directory {}", self.output_dir.display());
            fs::create_dir_all(&self.output_dir).at_path(&self.output_dir)?;
        }
        Ok(())
    }

    /// Write one aggregation document and return its path
    pub fn write_document(&self, index: usize, content: &str) -> Result<PathBuf> {
        let path = self.document_path(index);
        self.write_text(&path, content)?;
        Ok(path)
    }

    /// Write the structure listing and return its path
    pub fn write_structure(&self, content: &str) -> Result<PathBuf> {
        let path = self.structure_path();
        self.write_text(&path, content)?;
        Ok(path)
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_output_dir()?;
        let file = File::create(path).at_path(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).at_path(path)?;
        writer.flush().at_path(path)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}
