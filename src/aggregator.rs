/*!
 * Aggregation of selected files into Markdown documents
 */

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{GathererError, Result, ResultExt};
use crate::packer::DocumentPacker;
use crate::progress::{GatherProgress, ProgressSink};
use crate::types::{EntryKind, FileRecord, GatherOutcome, Section, SectionKind};
use crate::utils::{file_name_of, relative_display};
use crate::writer::OutputWriter;

/// Render the Markdown section for one file.
///
/// Binary files get a placeholder instead of their content and a failed read
/// is turned into an inline placeholder rather than an error.
pub fn render_section(catalog: &Catalog, path: &Path, relative_path: &str) -> Section {
    let name = file_name_of(path);
    let header = format!("\n## File: {}\n\n", relative_path);

    if let Some(ext) = catalog.binary_kind(path) {
        return Section {
            relative_path: relative_path.to_string(),
            kind: SectionKind::Binary,
            text: format!("{}Binary file: {} ({} file)\n", header, name, ext),
        };
    }

    match fs::read_to_string(path) {
        Ok(content) => {
            let language = catalog.language_for(path);
            Section {
                relative_path: relative_path.to_string(),
                kind: SectionKind::Text,
                text: format!(
                    "{}Here is the existing code for {}:\n\n```{}\n{}\n```\n",
                    header, relative_path, language, content
                ),
            }
        }
        Err(e) => {
            log::warn!("Unable to read {}: {}", path.display(), e);
            Section {
                relative_path: relative_path.to_string(),
                kind: SectionKind::Unreadable,
                text: format!("{}Unable to read file: {} ({})\n", header, name, e),
            }
        }
    }
}

/// Walks a selection and packs every reachable file into documents
pub struct Aggregator {
    /// Aggregator configuration
    config: Config,
    /// Output writer for this run
    writer: OutputWriter,
}

/// Mutable state of one run
struct Run<'a> {
    packer: DocumentPacker<'a>,
    seen: HashSet<PathBuf>,
    outcome: GatherOutcome,
}

impl Aggregator {
    /// Create an aggregator with a fresh run timestamp
    pub fn new(config: Config) -> Self {
        let writer = OutputWriter::new(&config.workspace_root, &config.output_dir_name);
        Self::with_writer(config, writer)
    }

    /// Create an aggregator writing through the given writer
    pub fn with_writer(config: Config, writer: OutputWriter) -> Self {
        Self { config, writer }
    }

    /// Gather the selected paths into documents and return what was written
    pub fn gather<P: ProgressSink + ?Sized>(
        &self,
        selection: &[PathBuf],
        progress: &P,
    ) -> Result<GatherOutcome> {
        if selection.is_empty() {
            return Err(GathererError::EmptySelection);
        }
        if !self.config.workspace_root.is_dir() {
            return Err(GathererError::WorkspaceNotFound(
                self.config.workspace_root.display().to_string(),
            ));
        }

        self.writer.ensure_output_dir()?;

        let mut run = Run {
            packer: DocumentPacker::new(&self.writer, self.config.max_chars),
            seen: HashSet::new(),
            outcome: GatherOutcome::default(),
        };

        let total = selection.len();
        for (i, item) in selection.iter().enumerate() {
            let path = self.resolve(item);
            self.process_item(&path, &mut run)?;
            progress.report(&GatherProgress {
                processed: i + 1,
                total,
            });
        }

        let Run {
            packer,
            mut outcome,
            ..
        } = run;
        outcome.documents = packer.finish()?;

        log::info!(
            "Gathered {} files into {} documents",
            outcome.files.len(),
            outcome.documents.len()
        );
        Ok(outcome)
    }

    /// Selection entries may be relative to the workspace root
    fn resolve(&self, item: &Path) -> PathBuf {
        if item.is_absolute() {
            item.to_path_buf()
        } else {
            self.config.workspace_root.join(item)
        }
    }

    /// Process one top-level selection entry
    fn process_item(&self, path: &Path, run: &mut Run<'_>) -> Result<()> {
        let name = file_name_of(path);
        if self.config.catalog.is_system_file(&name) {
            log::debug!("Skipping system file {}", path.display());
            return Ok(());
        }

        match EntryKind::stat(path).at_path(path)? {
            EntryKind::Directory => self.process_directory(path, run),
            EntryKind::File => self.process_file(path, run),
        }
    }

    /// Walk a directory depth-first in directory-listing order
    fn process_directory(&self, dir: &Path, run: &mut Run<'_>) -> Result<()> {
        if self.is_output_dir(dir) {
            log::debug!("Skipping output directory {}", dir.display());
            return Ok(());
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !self.should_skip(e));

        for entry in walker {
            let entry = entry?;
            match EntryKind::from_file_type(entry.file_type()) {
                EntryKind::Directory => continue,
                EntryKind::File => self.process_file(entry.path(), run)?,
            }
        }

        Ok(())
    }

    /// Render a file and hand it to the packer, once per canonical path
    fn process_file(&self, path: &Path, run: &mut Run<'_>) -> Result<()> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !run.seen.insert(key) {
            log::debug!("Already gathered {}", path.display());
            return Ok(());
        }

        let relative_path = relative_display(path, &self.config.workspace_root);
        let section = render_section(&self.config.catalog, path, &relative_path);
        let chars = section.char_count();
        let document = run.packer.push(&section)?;

        run.outcome.files.push(FileRecord {
            path: relative_path,
            kind: section.kind,
            chars,
            document,
        });
        Ok(())
    }

    /// Check if a walked entry is excluded together with its subtree
    pub fn should_skip(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.config.catalog.is_system_file(&name) {
            log::debug!("Skipping system file {}", entry.path().display());
            return true;
        }

        entry.file_type().is_dir() && self.is_output_dir(entry.path())
    }

    /// Don't gather the documents of earlier runs
    fn is_output_dir(&self, path: &Path) -> bool {
        if path.file_name() != Some(OsStr::new(&self.config.output_dir_name)) {
            return false;
        }

        match (
            fs::canonicalize(path),
            fs::canonicalize(self.writer.output_dir()),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
