/*!
 * Directory tree rendering with gitignore-style filtering
 */

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{GathererError, Result, ResultExt};
use crate::types::EntryKind;
use crate::writer::OutputWriter;

/// Prefix of every rendered entry
const BRANCH: &str = "├── ";

/// Indentation added per nesting level
const INDENT_UNIT: &str = "│   ";

/// A single ignore pattern with `*` as the only wildcard.
///
/// A relative path matches when the whole path matches the pattern, or when
/// it contains `/<pattern>` literally. Root anchoring is not distinguished.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    anchored: Regex,
    segment: String,
}

impl IgnorePattern {
    pub fn new(raw: &str) -> Result<Self> {
        let body = raw
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        Ok(Self {
            anchored: Regex::new(&format!("^{}$", body))?,
            segment: format!("/{}", raw),
        })
    }

    /// Test a `/`-separated path relative to the traversal root
    pub fn matches(&self, relative_path: &str) -> bool {
        self.anchored.is_match(relative_path) || relative_path.contains(&self.segment)
    }
}

/// Effective set of ignore patterns for one traversal
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| IgnorePattern::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Catalog defaults plus the lines of `<root>/.gitignore`, if present
    pub fn load(root: &Path, catalog: &Catalog) -> Result<Self> {
        let mut patterns: Vec<String> = catalog.default_ignore_patterns().to_vec();

        let gitignore = root.join(".gitignore");
        if gitignore.is_file() {
            let content = fs::read_to_string(&gitignore).at_path(&gitignore)?;
            let extra = parse_gitignore(&content);
            log::debug!(
                "Loaded {} patterns from {}",
                extra.len(),
                gitignore.display()
            );
            patterns.extend(extra);
        }

        Self::from_patterns(patterns)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative_path))
    }
}

/// Non-blank, non-comment lines of a `.gitignore`, trimmed and otherwise verbatim
pub fn parse_gitignore(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Renders a directory tree as box-drawing text
pub struct StructureRenderer {
    /// Renderer configuration
    config: Config,
    /// Output writer for this run
    writer: OutputWriter,
}

impl StructureRenderer {
    /// Create a renderer with a fresh run timestamp
    pub fn new(config: Config) -> Self {
        let writer = OutputWriter::new(&config.workspace_root, &config.output_dir_name);
        Self::with_writer(config, writer)
    }

    /// Create a renderer writing through the given writer
    pub fn with_writer(config: Config, writer: OutputWriter) -> Self {
        Self { config, writer }
    }

    /// Render the tree under `root` and write it; returns the written path
    pub fn generate(&self, root: &Path) -> Result<PathBuf> {
        let structure = self.render(root)?;
        self.writer.write_structure(&structure)
    }

    /// Render the tree under `root` without writing anything
    pub fn render(&self, root: &Path) -> Result<String> {
        if !root.is_dir() {
            return Err(GathererError::WorkspaceNotFound(root.display().to_string()));
        }

        let ignore = IgnoreSet::load(root, &self.config.catalog)?;
        let mut out = String::new();
        self.render_directory(root, "", "", &ignore, &mut out)?;
        Ok(out)
    }

    /// Render the immediate entries of `dir`, recursing into directories
    fn render_directory(
        &self,
        dir: &Path,
        rel_dir: &str,
        indent: &str,
        ignore: &IgnoreSet,
        out: &mut String,
    ) -> Result<()> {
        let entries = WalkDir::new(dir).min_depth(1).max_depth(1);

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let rel_path = if rel_dir.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", rel_dir, name)
            };

            if ignore.is_ignored(&rel_path) {
                log::trace!("Ignoring {}", rel_path);
                continue;
            }

            match EntryKind::stat(entry.path()).at_path(entry.path())? {
                EntryKind::Directory => {
                    out.push_str(&format!("{}{}{}/\n", indent, BRANCH, name));
                    let nested = format!("{}{}", indent, INDENT_UNIT);
                    self.render_directory(entry.path(), &rel_path, &nested, ignore, out)?;
                }
                EntryKind::File => match self.config.catalog.binary_kind(entry.path()) {
                    Some(ext) => {
                        out.push_str(&format!("{}{}{} ({} file)\n", indent, BRANCH, name, ext))
                    }
                    None => out.push_str(&format!("{}{}{}\n", indent, BRANCH, name)),
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gitignore() {
        let content = "# build output\nbuild\n\n  *.tmp  \n#comment\nlogs/\r\n";
        assert_eq!(parse_gitignore(content), vec!["build", "*.tmp", "logs/"]);
    }

    #[test]
    fn test_pattern_anchored_match() -> Result<()> {
        let pattern = IgnorePattern::new("*.log")?;
        assert!(pattern.matches("debug.log"));
        assert!(pattern.matches("logs/debug.log"));
        assert!(!pattern.matches("debug.log.txt"));
        Ok(())
    }

    #[test]
    fn test_pattern_segment_match() -> Result<()> {
        let pattern = IgnorePattern::new("build")?;
        assert!(pattern.matches("build"));
        assert!(pattern.matches("app/build"));
        assert!(pattern.matches("app/build/out.js"));
        // Substring fallback also catches longer segments
        assert!(pattern.matches("app/buildscripts"));
        assert!(!pattern.matches("rebuild"));
        Ok(())
    }

    #[test]
    fn test_pattern_dots_are_literal() -> Result<()> {
        let pattern = IgnorePattern::new(".git")?;
        assert!(pattern.matches(".git"));
        assert!(!pattern.matches("xgit"));
        Ok(())
    }

    #[test]
    fn test_ignore_set() -> Result<()> {
        let set = IgnoreSet::from_patterns(["node_modules", "*.pyc"])?;
        assert_eq!(set.len(), 2);
        assert!(set.is_ignored("node_modules"));
        assert!(set.is_ignored("web/node_modules"));
        assert!(set.is_ignored("pkg/mod.pyc"));
        assert!(!set.is_ignored("src/main.py"));
        Ok(())
    }
}
