/*!
 * Core types and data structures for codegatherer
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a filesystem entry as reported by a stat that follows symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (or anything that is not a directory)
    File,
    /// Directory containing other entries
    Directory,
}

impl EntryKind {
    /// Stat a path and classify it
    pub fn stat(path: &Path) -> io::Result<Self> {
        Ok(Self::from_metadata(&fs::metadata(path)?))
    }

    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        if metadata.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// How a single file ended up in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Content included in a fenced block
    Text,
    /// Binary placeholder
    Binary,
    /// Unreadable placeholder
    Unreadable,
}

/// One rendered `## File:` section
#[derive(Debug, Clone)]
pub struct Section {
    /// Path relative to the workspace root, `/`-separated
    pub relative_path: String,
    /// Section kind
    pub kind: SectionKind,
    /// Rendered Markdown text
    pub text: String,
}

impl Section {
    /// Size of the rendered section in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// A document that has been flushed to disk
#[derive(Debug, Clone, Serialize)]
pub struct WrittenDocument {
    /// Document index within the run
    pub index: usize,
    /// Location on disk
    pub path: PathBuf,
    /// Number of characters written
    pub chars: usize,
    /// Number of bytes written
    pub bytes: u64,
    /// Number of file sections in the document
    pub sections: usize,
}

/// Per-file record kept for the run report
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Path relative to the workspace root
    pub path: String,
    /// Section kind
    pub kind: SectionKind,
    /// Rendered size in characters
    pub chars: usize,
    /// Index of the document the section landed in
    pub document: usize,
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct GatherOutcome {
    /// Documents in index order
    pub documents: Vec<WrittenDocument>,
    /// Files in emission order
    pub files: Vec<FileRecord>,
}

impl GatherOutcome {
    /// Paths of the written documents in index order
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.documents.iter().map(|d| d.path.clone()).collect()
    }

    /// First document, which is the one handed to the clipboard
    pub fn first_document(&self) -> Option<&WrittenDocument> {
        self.documents.first()
    }
}
