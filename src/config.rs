/*!
 * Configuration handling for codegatherer
 */

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::catalog::Catalog;
use crate::ensure;
use crate::error::{GathererError, Result};
use crate::packer::DEFAULT_MAX_CHARS;
use crate::report::ReportFormat;
use crate::writer::OUTPUT_DIR_NAME;

/// Command-line arguments for codegatherer
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codegatherer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Gather project files into Markdown documents for AI chat context",
    long_about = "Concatenates selected files and folders into Markdown documents ready to paste into an AI chat assistant, and renders the project's directory tree."
)]
pub struct Args {
    /// Workspace root; output goes to <workspace>/CodeGatherer
    #[clap(long, short = 'w', global = true)]
    pub workspace: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Silence all logging
    #[clap(long, short = 'q', global = true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Concatenate files and folders into Markdown documents
    Gather {
        /// Files and folders to gather, in order
        #[clap(required = true)]
        paths: Vec<PathBuf>,

        /// Character budget of a single document
        #[clap(long, default_value_t = DEFAULT_MAX_CHARS)]
        max_chars: usize,

        /// Copy the first document to the system clipboard
        #[clap(long)]
        clip: bool,

        /// Format of the run summary
        #[clap(long, value_enum, default_value_t = ReportFormat::Table)]
        report: ReportFormat,
    },

    /// Render the directory tree of a project
    Structure {
        /// Root of the tree (defaults to the workspace)
        root: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Workspace root, base of relative paths and of the output directory
    pub workspace_root: PathBuf,

    /// Name of the output directory under the workspace root
    pub output_dir_name: String,

    /// Character budget of a single document
    pub max_chars: usize,

    /// Copy the first document to the clipboard
    pub clip: bool,

    /// Format of the run summary
    pub report_format: ReportFormat,

    /// Lookup tables
    pub catalog: Catalog,
}

impl Config {
    /// Configuration with defaults for the given workspace
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            output_dir_name: OUTPUT_DIR_NAME.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            clip: false,
            report_format: ReportFormat::Table,
            catalog: Catalog::default(),
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let workspace_root = match &args.workspace {
            Some(path) => path.clone(),
            None => env::current_dir().map_err(|e| {
                GathererError::WorkspaceNotFound(format!("cannot resolve current directory: {}", e))
            })?,
        };

        let mut config = Self::new(workspace_root);
        if let Command::Gather {
            max_chars,
            clip,
            report,
            ..
        } = &args.command
        {
            config.max_chars = *max_chars;
            config.clip = *clip;
            config.report_format = *report;
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.workspace_root.is_dir() {
            return Err(GathererError::WorkspaceNotFound(
                self.workspace_root.display().to_string(),
            ));
        }

        ensure!(
            self.max_chars > 0,
            Config,
            "character budget must be greater than 0"
        );
        ensure!(
            !self.output_dir_name.is_empty(),
            Config,
            "output directory name must not be empty"
        );

        Ok(())
    }
}
