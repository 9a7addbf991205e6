/*!
 * Tests for CodeGatherer functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::tempdir;

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::error::GathererError;
use crate::packer::{CONTINUED_MARKER, PREAMBLE};
use crate::progress::{GatherProgress, NoProgress};
use crate::structure::StructureRenderer;
use crate::writer::{OutputWriter, OUTPUT_DIR_NAME};

const STAMP: &str = "2024-01-02T03-04-05";

// Helper function to create a test workspace
fn setup_test_workspace() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("src").join("utils"))?;
    fs::create_dir(root.join("assets"))?;

    let mut main = File::create(root.join("src").join("main.rs"))?;
    writeln!(main, "fn main() {{}}")?;

    let mut helper = File::create(root.join("src").join("utils").join("helper.py"))?;
    writeln!(helper, "def helper():\n    return 1")?;

    let mut readme = File::create(root.join("README.md"))?;
    writeln!(readme, "# Project")?;

    let mut logo = File::create(root.join("assets").join("logo.png"))?;
    logo.write_all(&[0x89, b'P', b'N', b'G', 0, 1, 2])?;

    // System-generated entries
    File::create(root.join("src").join(".DS_Store"))?;
    fs::create_dir(root.join(".git"))?;
    let mut git_config = File::create(root.join(".git").join("config"))?;
    writeln!(git_config, "[core]")?;

    Ok(temp_dir)
}

fn aggregator_for(root: &Path, max_chars: usize) -> Aggregator {
    let mut config = Config::new(root);
    config.max_chars = max_chars;
    let writer = OutputWriter::with_timestamp(root, OUTPUT_DIR_NAME, STAMP.to_string());
    Aggregator::with_writer(config, writer)
}

fn renderer_for(root: &Path) -> StructureRenderer {
    let config = Config::new(root);
    let writer = OutputWriter::with_timestamp(root, OUTPUT_DIR_NAME, STAMP.to_string());
    StructureRenderer::with_writer(config, writer)
}

fn read_all(paths: &[PathBuf]) -> io::Result<Vec<String>> {
    paths.iter().map(fs::read_to_string).collect()
}

#[test]
fn test_single_typescript_file() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("src"))?;
    fs::write(temp_dir.path().join("src").join("a.ts"), "let x=1;")?;

    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(&[temp_dir.path().join("src/a.ts")], &NoProgress)?;

    assert_eq!(outcome.documents.len(), 1);
    let text = fs::read_to_string(&outcome.documents[0].path)?;
    assert_eq!(
        text,
        format!(
            "{}\n## File: src/a.ts\n\nHere is the existing code for src/a.ts:\n\n```typescript\nlet x=1;\n```\n",
            PREAMBLE
        )
    );
    Ok(())
}

#[test]
fn test_document_naming() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(&[PathBuf::from("README.md")], &NoProgress)?;

    assert_eq!(
        outcome.document_paths(),
        vec![temp_dir
            .path()
            .join(OUTPUT_DIR_NAME)
            .join(format!("code-analysis-{}-0.md", STAMP))]
    );
    Ok(())
}

#[test]
fn test_directory_selection() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(&[temp_dir.path().to_path_buf()], &NoProgress)?;

    let mut gathered: Vec<_> = outcome.files.iter().map(|f| f.path.clone()).collect();
    gathered.sort();
    assert_eq!(
        gathered,
        vec![
            "README.md",
            "assets/logo.png",
            "src/main.rs",
            "src/utils/helper.py"
        ]
    );

    let text = read_all(&outcome.document_paths())?.concat();
    assert!(text.contains("## File: src/utils/helper.py"));
    assert!(text.contains("```python\ndef helper():"));
    assert!(text.contains("```rust\nfn main() {}"));
    assert!(text.contains("Binary file: logo.png (png file)"));

    // System files are skipped at every depth
    assert!(!text.contains(".DS_Store"));
    assert!(!text.contains("[core]"));
    Ok(())
}

#[test]
fn test_system_file_selected_directly() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(
        &[temp_dir.path().join(".git"), temp_dir.path().join("README.md")],
        &NoProgress,
    )?;

    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].path, "README.md");
    Ok(())
}

#[test]
fn test_overlapping_selection_is_deduplicated() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(
        &[
            temp_dir.path().join("src").join("main.rs"),
            temp_dir.path().join("src"),
        ],
        &NoProgress,
    )?;

    let text = read_all(&outcome.document_paths())?.concat();
    assert_eq!(text.matches("## File: src/main.rs").count(), 1);
    assert_eq!(text.matches("## File: src/utils/helper.py").count(), 1);
    assert_eq!(outcome.files.len(), 2);
    Ok(())
}

#[test]
fn test_previous_output_not_regathered() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let first = aggregator_for(temp_dir.path(), 800_000);
    first.gather(&[PathBuf::from("README.md")], &NoProgress)?;

    let second = aggregator_for(temp_dir.path(), 800_000);
    let outcome = second.gather(&[temp_dir.path().to_path_buf()], &NoProgress)?;
    assert!(outcome
        .files
        .iter()
        .all(|f| !f.path.starts_with(OUTPUT_DIR_NAME)));
    Ok(())
}

#[test]
fn test_unreadable_file_becomes_placeholder() -> io::Result<()> {
    let temp_dir = tempdir()?;
    // Invalid UTF-8 fails the text read without needing permission tricks
    fs::write(temp_dir.path().join("data.txt"), [0xff, 0xfe, 0xfd])?;
    fs::write(temp_dir.path().join("ok.txt"), "fine")?;

    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(
        &[temp_dir.path().join("data.txt"), temp_dir.path().join("ok.txt")],
        &NoProgress,
    )?;

    let text = read_all(&outcome.document_paths())?.concat();
    assert!(text.contains("## File: data.txt\n\nUnable to read file: data.txt ("));
    assert!(text.contains("```plaintext\nfine\n```"));
    Ok(())
}

#[test]
fn test_chunking_two_documents() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let budget = 800_000;
    let body = "a".repeat(199_900);
    let mut selection = Vec::new();
    for i in 0..5 {
        let path = temp_dir.path().join(format!("part{}.txt", i));
        fs::write(&path, &body)?;
        selection.push(path);
    }

    let aggregator = aggregator_for(temp_dir.path(), budget);
    let outcome = aggregator.gather(&selection, &NoProgress)?;

    let total: usize = outcome.files.iter().map(|f| f.chars).sum();
    assert!(total > budget && total < 2 * budget);
    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(
        outcome.documents.iter().map(|d| d.index).collect::<Vec<_>>(),
        vec![0, 1]
    );

    let texts = read_all(&outcome.document_paths())?;
    assert!(texts[0].starts_with(PREAMBLE));
    assert!(texts[1].starts_with(CONTINUED_MARKER));
    for text in &texts {
        assert!(text.chars().count() <= budget);
    }
    Ok(())
}

#[test]
fn test_oversized_file_gets_own_document() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("small.txt"), "small")?;
    fs::write(temp_dir.path().join("huge.txt"), "h".repeat(5_000))?;

    let aggregator = aggregator_for(temp_dir.path(), 1_000);
    let outcome = aggregator.gather(
        &[temp_dir.path().join("small.txt"), temp_dir.path().join("huge.txt")],
        &NoProgress,
    )?;

    assert_eq!(outcome.documents.len(), 2);
    assert_eq!(outcome.documents[1].sections, 1);
    let huge = fs::read_to_string(&outcome.documents[1].path)?;
    assert!(huge.contains(&"h".repeat(5_000)));
    Ok(())
}

#[test]
fn test_deterministic_content() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let selection = vec![temp_dir.path().join("src"), temp_dir.path().join("README.md")];

    let first = aggregator_for(temp_dir.path(), 800_000).gather(&selection, &NoProgress)?;
    let first_text = read_all(&first.document_paths())?;

    let writer = OutputWriter::with_timestamp(
        temp_dir.path(),
        OUTPUT_DIR_NAME,
        "2030-01-01T00-00-00".to_string(),
    );
    let second = Aggregator::with_writer(Config::new(temp_dir.path()), writer)
        .gather(&selection, &NoProgress)?;
    let second_text = read_all(&second.document_paths())?;

    assert_eq!(first_text, second_text);
    assert_ne!(first.document_paths(), second.document_paths());
    Ok(())
}

#[test]
fn test_progress_per_top_level_item() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let updates = Mutex::new(Vec::new());
    let sink = |p: &GatherProgress| updates.lock().unwrap().push(p.percentage());

    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    aggregator.gather(
        &[
            temp_dir.path().join("src"),
            temp_dir.path().join("assets"),
            temp_dir.path().join("README.md"),
            temp_dir.path().join(".git"),
        ],
        &sink,
    )?;

    assert_eq!(*updates.lock().unwrap(), vec![25, 50, 75, 100]);
    Ok(())
}

#[test]
fn test_empty_selection_is_fatal() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let err = aggregator.gather(&[], &NoProgress).unwrap_err();
    assert!(matches!(err, GathererError::EmptySelection));
    assert!(!temp_dir.path().join(OUTPUT_DIR_NAME).exists());
    Ok(())
}

#[test]
fn test_missing_selection_is_fatal() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let err = aggregator
        .gather(&[temp_dir.path().join("missing")], &NoProgress)
        .unwrap_err();
    assert!(matches!(err, GathererError::IoAt { .. }));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unlistable_entry_in_selection_is_fatal() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("d"))?;
    fs::write(root.join("d").join("a.rs"), "fn a() {}")?;
    std::os::unix::fs::symlink(root.join("missing"), root.join("d").join("dangling"))?;

    let aggregator = aggregator_for(root, 800_000);
    let err = aggregator
        .gather(&[root.join("d")], &NoProgress)
        .unwrap_err();
    assert!(matches!(err, GathererError::Walk(_)));

    let written = fs::read_dir(root.join(OUTPUT_DIR_NAME))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(written, 0);
    Ok(())
}

#[test]
fn test_parent_components_are_resolved_in_headers() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let aggregator = aggregator_for(temp_dir.path(), 800_000);
    let outcome = aggregator.gather(&[PathBuf::from("src/../README.md")], &NoProgress)?;

    assert_eq!(outcome.files.len(), 1);
    assert_eq!(outcome.files[0].path, "README.md");
    let text = read_all(&outcome.document_paths())?.concat();
    assert!(text.contains("## File: README.md\n"));
    assert!(!text.contains("src/README.md"));
    Ok(())
}

#[test]
fn test_missing_workspace_is_fatal() {
    let aggregator = aggregator_for(Path::new("/nonexistent/workspace"), 800_000);
    let err = aggregator
        .gather(&[PathBuf::from("a.rs")], &NoProgress)
        .unwrap_err();
    assert!(matches!(err, GathererError::WorkspaceNotFound(_)));
}

#[test]
fn test_structure_basic() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let structure = renderer_for(temp_dir.path()).render(temp_dir.path())?;

    assert!(structure.contains("├── src/\n"));
    assert!(structure.contains("│   ├── main.rs\n"));
    assert!(structure.contains("│   ├── utils/\n"));
    assert!(structure.contains("│   │   ├── helper.py\n"));
    assert!(structure.contains("├── assets/\n"));
    assert!(structure.contains("│   ├── logo.png (png file)\n"));
    assert!(structure.contains("├── README.md\n"));

    // Defaults ignore .git and .DS_Store
    assert!(!structure.contains(".git"));
    assert!(!structure.contains(".DS_Store"));
    Ok(())
}

#[test]
fn test_structure_respects_gitignore() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let root = temp_dir.path();
    fs::write(root.join(".gitignore"), "# output\nbuild\n\n*.tmp\n")?;
    fs::create_dir_all(root.join("build").join("deep"))?;
    fs::write(root.join("build").join("deep").join("out.js"), "x")?;
    fs::write(root.join("src").join("scratch.tmp"), "x")?;

    let structure = renderer_for(root).render(root)?;

    assert!(!structure.contains("build"));
    assert!(!structure.contains("deep"));
    assert!(!structure.contains("out.js"));
    assert!(!structure.contains("scratch.tmp"));
    // The .gitignore itself is listed; only its patterns filter
    assert!(structure.contains("├── .gitignore\n"));
    Ok(())
}

#[test]
fn test_structure_ignores_nested_default_dirs() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("web").join("node_modules").join("lib"))?;
    fs::write(root.join("web").join("node_modules").join("lib").join("x.js"), "x")?;
    fs::write(root.join("web").join("app.js"), "x")?;
    fs::write(root.join("web").join("debug.log"), "x")?;

    let structure = renderer_for(root).render(root)?;
    assert_eq!(structure, "├── web/\n│   ├── app.js\n");
    Ok(())
}

#[test]
fn test_structure_generate_writes_file() -> io::Result<()> {
    let temp_dir = setup_test_workspace()?;
    let path = renderer_for(temp_dir.path()).generate(temp_dir.path())?;

    assert_eq!(
        path,
        temp_dir
            .path()
            .join(OUTPUT_DIR_NAME)
            .join(format!("project-structure-{}.txt", STAMP))
    );
    assert!(fs::read_to_string(path)?.contains("├── src/"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_structure_broken_symlink_is_fatal() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    std::os::unix::fs::symlink(root.join("missing"), root.join("dangling"))?;

    let renderer = renderer_for(root);
    assert!(renderer.render(root).is_err());
    assert!(renderer.generate(root).is_err());
    assert!(!root.join(OUTPUT_DIR_NAME).exists());
    Ok(())
}
