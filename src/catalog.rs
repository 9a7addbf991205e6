/*!
 * Static lookup tables: extension to language, binary extensions,
 * system-generated names and default ignore patterns.
 *
 * The tables are plain data. A [`Catalog`] is built once at startup and
 * handed to the aggregator and the structure renderer.
 */

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;

/// Language tag used when an extension is not in the table
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Extension (lowercase, no dot) to fenced-block language tag
const LANGUAGES: &[(&str, &str)] = &[
    // Web development
    ("html", "html"),
    ("htm", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("sass", "sass"),
    ("less", "less"),
    ("js", "javascript"),
    ("jsx", "jsx"),
    ("ts", "typescript"),
    ("tsx", "tsx"),
    ("json", "json"),
    ("xml", "xml"),
    ("svg", "svg"),
    // Server-side languages
    ("php", "php"),
    ("py", "python"),
    ("rb", "ruby"),
    ("java", "java"),
    ("class", "java"),
    ("cs", "csharp"),
    ("go", "go"),
    ("rs", "rust"),
    ("scala", "scala"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("groovy", "groovy"),
    ("gradle", "gradle"),
    // Shell and scripting
    ("sh", "bash"),
    ("bash", "bash"),
    ("zsh", "zsh"),
    ("fish", "fish"),
    ("ps1", "powershell"),
    ("bat", "batch"),
    ("cmd", "batch"),
    ("vbs", "vbscript"),
    ("vb", "vb"),
    ("pl", "perl"),
    ("pm", "perl"),
    ("t", "perl"),
    ("lua", "lua"),
    // Markup and config
    ("md", "markdown"),
    ("markdown", "markdown"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("cfg", "ini"),
    ("conf", "conf"),
    ("properties", "properties"),
    // C family
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("hpp", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("m", "objectivec"),
    ("mm", "objectivec"),
    // Database
    ("sql", "sql"),
    ("mysql", "sql"),
    ("pgsql", "sql"),
    ("plsql", "plsql"),
    // Other programming languages
    ("hs", "haskell"),
    ("lhs", "haskell"),
    ("elm", "elm"),
    ("clj", "clojure"),
    ("cljs", "clojure"),
    ("cljc", "clojure"),
    ("erl", "erlang"),
    ("ex", "elixir"),
    ("exs", "elixir"),
    ("eex", "elixir"),
    ("r", "r"),
    ("rmd", "rmd"),
    ("jl", "julia"),
    ("dart", "dart"),
    ("f", "fortran"),
    ("f90", "fortran"),
    ("fs", "fsharp"),
    ("fsx", "fsharp"),
    ("pas", "pascal"),
    ("d", "d"),
    ("v", "v"),
    ("nim", "nim"),
    ("cr", "crystal"),
    // Web assembly
    ("wat", "wat"),
    ("wasm", "wasm"),
    // Game development
    ("gd", "gdscript"),
    ("as", "actionscript"),
    // DevOps and infrastructure
    ("tf", "terraform"),
    ("tfvars", "terraform"),
    ("hcl", "hcl"),
    ("dockerfile", "dockerfile"),
    ("dockerignore", "dockerignore"),
    ("vagrantfile", "ruby"),
    ("jenkinsfile", "groovy"),
    // Data serialization
    ("proto", "protobuf"),
    ("thrift", "thrift"),
    // Template engines
    ("ejs", "ejs"),
    ("pug", "pug"),
    ("hbs", "handlebars"),
    ("mustache", "mustache"),
    ("twig", "twig"),
    ("liquid", "liquid"),
    // Others
    ("graphql", "graphql"),
    ("dot", "dot"),
    ("tex", "latex"),
    ("rst", "restructuredtext"),
    ("asciidoc", "asciidoc"),
    ("adoc", "asciidoc"),
    // Mobile
    ("swift", "swift"),
];

/// Extensions whose content is never read
const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "tiff", "ico", "svg",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Media
    "mp3", "mp4", "avi", "mov", "wav",
    // Fonts
    "ttf", "otf", "woff", "woff2",
    // Archives
    "zip", "rar", "7z", "tar", "gz",
    // Executables and libraries
    "exe", "dll", "so", "dylib",
];

/// OS, VCS and editor metadata skipped by the aggregator
const SYSTEM_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    ".git",
    ".gitignore",
    ".gitattributes",
    ".gitmodules",
    ".vscode",
    ".idea",
    ".vs",
];

/// Patterns always applied by the structure renderer
const DEFAULT_IGNORE: &[&str] = &[
    // Version control and dependencies
    "node_modules",
    ".git",
    "vendor",
    // Build output
    ".next",
    "build",
    "dist",
    "out",
    "target",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    // Editors
    ".vscode",
    ".idea",
    "*.swp",
    // Generated files
    "*.class",
    "*.log",
    "*.sqlite",
    // OS files
    ".DS_Store",
    "Thumbs.db",
];

/// The built-in catalog, shared by every run in the process
pub static BUILTIN: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// Immutable lookup tables consulted during traversal
#[derive(Debug, Clone)]
pub struct Catalog {
    languages: HashMap<String, String>,
    binary_extensions: HashSet<String>,
    system_files: HashSet<String>,
    default_ignore: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Catalog {
    /// Build the catalog from the built-in tables
    pub fn builtin() -> Self {
        Self {
            languages: LANGUAGES
                .iter()
                .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
                .collect(),
            binary_extensions: BINARY_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            system_files: SYSTEM_FILES.iter().map(|f| f.to_string()).collect(),
            default_ignore: DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Language tag for a path, `plaintext` when unknown
    pub fn language_for(&self, path: &Path) -> &str {
        extension_of(path)
            .and_then(|ext| self.languages.get(&ext))
            .map(String::as_str)
            .unwrap_or(FALLBACK_LANGUAGE)
    }

    /// Lowercased extension if the path is classified as binary
    pub fn binary_kind(&self, path: &Path) -> Option<String> {
        extension_of(path).filter(|ext| self.binary_extensions.contains(ext))
    }

    /// Whether a file or directory name is OS/VCS/editor metadata
    pub fn is_system_file(&self, name: &str) -> bool {
        self.system_files.contains(name)
    }

    pub fn default_ignore_patterns(&self) -> &[String] {
        &self.default_ignore
    }
}

/// Lowercased extension without the leading dot
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
