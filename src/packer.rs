/*!
 * Packing of rendered file sections into size-bounded documents
 */

use crate::error::Result;
use crate::types::{Section, WrittenDocument};
use crate::writer::OutputWriter;

/// Default character budget of a single document
pub const DEFAULT_MAX_CHARS: usize = 800_000;

/// Instructional text opening the first document of a run
pub const PREAMBLE: &str = "# Here is code from our project for analysis and improvement. \
Please review and study this existing code and provide production-ready code with file names \
and file paths. Make sure to provide a separate artifact for each file.\n\n";

/// Separator opening every document after the first
pub const CONTINUED_MARKER: &str = "\n\n(Continued from previous file)\n\n";

/// Accumulates sections and flushes a document whenever the budget would be exceeded.
///
/// A section is never split. When a document already holds at least one
/// section and the next one does not fit, the document is written and a new
/// one is started. A section larger than the whole budget therefore ends up
/// alone in its own document.
pub struct DocumentPacker<'a> {
    writer: &'a OutputWriter,
    max_chars: usize,
    index: usize,
    buffer: String,
    char_count: usize,
    sections: usize,
    written: Vec<WrittenDocument>,
}

impl<'a> DocumentPacker<'a> {
    /// Start document 0 with the preamble
    pub fn new(writer: &'a OutputWriter, max_chars: usize) -> Self {
        Self {
            writer,
            max_chars,
            index: 0,
            buffer: PREAMBLE.to_string(),
            char_count: PREAMBLE.chars().count(),
            sections: 0,
            written: Vec::new(),
        }
    }

    /// Append a section, flushing first if it would overflow the current document.
    /// Returns the index of the document the section was placed in.
    pub fn push(&mut self, section: &Section) -> Result<usize> {
        let size = section.char_count();

        if self.sections > 0 && self.char_count + size > self.max_chars {
            log::debug!(
                "Document {} full at {} chars, {} needs {} more",
                self.index,
                self.char_count,
                section.relative_path,
                size
            );
            self.flush()?;
            self.buffer.push_str(CONTINUED_MARKER);
            self.char_count = CONTINUED_MARKER.chars().count();
        }

        if size > self.max_chars {
            log::warn!(
                "{} renders to {} chars, over the {} char budget; writing it whole",
                section.relative_path,
                size,
                self.max_chars
            );
        }

        self.buffer.push_str(&section.text);
        self.char_count += size;
        self.sections += 1;
        Ok(self.index)
    }

    /// Write whatever is buffered and return every document of the run
    pub fn finish(mut self) -> Result<Vec<WrittenDocument>> {
        if !self.buffer.is_empty() {
            self.flush()?;
        }
        Ok(self.written)
    }

    fn flush(&mut self) -> Result<()> {
        let path = self.writer.write_document(self.index, &self.buffer)?;
        self.written.push(WrittenDocument {
            index: self.index,
            path,
            chars: self.char_count,
            bytes: self.buffer.len() as u64,
            sections: self.sections,
        });

        self.index += 1;
        self.buffer.clear();
        self.char_count = 0;
        self.sections = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionKind;
    use crate::writer::OUTPUT_DIR_NAME;
    use std::fs;
    use tempfile::tempdir;

    fn section(name: &str, size: usize) -> Section {
        Section {
            relative_path: name.to_string(),
            kind: SectionKind::Text,
            text: "x".repeat(size),
        }
    }

    fn preamble_len() -> usize {
        PREAMBLE.chars().count()
    }

    #[test]
    fn test_single_document() -> Result<()> {
        let temp_dir = tempdir()?;
        let writer = OutputWriter::new(temp_dir.path(), OUTPUT_DIR_NAME);
        let mut packer = DocumentPacker::new(&writer, 1_000);

        assert_eq!(packer.push(&section("a", 100))?, 0);
        assert_eq!(packer.push(&section("b", 100))?, 0);
        let docs = packer.finish()?;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].sections, 2);
        assert_eq!(docs[0].chars, preamble_len() + 200);
        let text = fs::read_to_string(&docs[0].path)?;
        assert!(text.starts_with(PREAMBLE));
        Ok(())
    }

    #[test]
    fn test_overflow_starts_continued_document() -> Result<()> {
        let temp_dir = tempdir()?;
        let writer = OutputWriter::new(temp_dir.path(), OUTPUT_DIR_NAME);
        let mut packer = DocumentPacker::new(&writer, DEFAULT_MAX_CHARS);

        // Five 200k sections: the fourth pushes document 0 past the budget
        let mut placed = Vec::new();
        for i in 0..5 {
            placed.push(packer.push(&section(&format!("f{}", i), 200_000))?);
        }
        let docs = packer.finish()?;

        assert_eq!(placed, vec![0, 0, 0, 1, 1]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.iter().map(|d| d.index).collect::<Vec<_>>(), vec![0, 1]);
        for doc in &docs {
            assert!(doc.chars <= DEFAULT_MAX_CHARS);
        }

        let second = fs::read_to_string(&docs[1].path)?;
        assert!(second.starts_with(CONTINUED_MARKER));
        assert_eq!(second.chars().count(), docs[1].chars);
        Ok(())
    }

    #[test]
    fn test_oversized_section_is_written_whole() -> Result<()> {
        let temp_dir = tempdir()?;
        let writer = OutputWriter::new(temp_dir.path(), OUTPUT_DIR_NAME);
        let mut packer = DocumentPacker::new(&writer, 500);

        packer.push(&section("small", 100))?;
        packer.push(&section("huge", 2_000))?;
        packer.push(&section("after", 100))?;
        let docs = packer.finish()?;

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[1].sections, 1);
        assert!(docs[1].chars > 500);
        assert_eq!(docs[2].sections, 1);
        assert!(docs[2].chars <= 500);
        Ok(())
    }

    #[test]
    fn test_empty_run_writes_preamble_only() -> Result<()> {
        let temp_dir = tempdir()?;
        let writer = OutputWriter::new(temp_dir.path(), OUTPUT_DIR_NAME);
        let packer = DocumentPacker::new(&writer, 500);
        let docs = packer.finish()?;

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].sections, 0);
        assert_eq!(fs::read_to_string(&docs[0].path)?, PREAMBLE);
        Ok(())
    }
}
