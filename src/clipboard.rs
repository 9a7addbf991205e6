/*!
 * Clipboard support for codegatherer
 *
 * Copies a generated document to the system clipboard through whichever
 * clipboard command the platform provides.
 */

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Clipboard commands, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    Tmux,
    Wayland,
    Xsel,
    Xclip,
    MacOS,
    Windows,
    Termux,
}

impl ClipboardProvider {
    /// Program reading the text from stdin
    fn program(self) -> &'static str {
        match self {
            Self::Tmux => "tmux",
            Self::Wayland => "wl-copy",
            Self::Xsel => "xsel",
            Self::Xclip => "xclip",
            Self::MacOS => "pbcopy",
            Self::Windows => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Tmux => &["load-buffer", "-w", "-"],
            Self::Xsel => &["-b", "-i"],
            Self::Xclip => &["-selection", "clipboard", "-in"],
            _ => &[],
        }
    }

    /// Pipe `text` into the provider's command
    pub fn copy(self, text: &str) -> Result<()> {
        let cmd = self.program();
        let mut child = Command::new(cmd)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed(format!("failed to spawn {}: {}", cmd, e)))?;

        child
            .stdin
            .take()
            .ok_or_else(|| ClipboardError::CommandFailed(format!("no stdin for {}", cmd)))?
            .write_all(text.as_bytes())?;

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed(format!(
                "{} exited with status: {}",
                cmd, status
            )))
        }
    }
}

/// Copy text to the clipboard with the first provider that succeeds
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let providers = detect_providers();
    if providers.is_empty() {
        return Err(ClipboardError::NoClipboardFound);
    }

    let mut last_error = ClipboardError::NoClipboardFound;
    for provider in providers {
        match provider.copy(text) {
            Ok(()) => {
                log::debug!("Copied {} bytes with {:?}", text.len(), provider);
                return Ok(());
            }
            Err(e) => {
                log::debug!("Clipboard provider {:?} failed: {}", provider, e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Copy the full text of a generated document to the clipboard
pub fn copy_file_to_clipboard(path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    copy_to_clipboard(&content)
}

/// Check if a command exists in the PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}

/// Platform detection cache
static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "android") {
            "android"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else {
            "unknown"
        }
    })
}

/// Providers available on this system, in order of preference
pub fn detect_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::new();

    // Inside tmux the tmux buffer comes first
    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    let candidates: &[ClipboardProvider] = match get_platform() {
        "macos" => &[ClipboardProvider::MacOS],
        "windows" | "wsl" => &[ClipboardProvider::Windows],
        "linux" => &[
            ClipboardProvider::Wayland,
            ClipboardProvider::Xsel,
            ClipboardProvider::Xclip,
        ],
        "android" => &[ClipboardProvider::Termux],
        _ => &[],
    };

    providers.extend(
        candidates
            .iter()
            .copied()
            .filter(|p| command_exists(p.program())),
    );
    providers
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("nonexistentcommandxyz"));
    }

    #[test]
    fn test_get_platform() {
        let platform = get_platform();
        assert!(["macos", "windows", "wsl", "linux", "android", "unknown"].contains(&platform));
        assert_eq!(platform, get_platform());
    }

    #[test]
    fn test_detected_providers_exist() {
        for provider in detect_providers() {
            assert!(command_exists(provider.program()));
        }
    }

    #[test]
    fn test_copy_missing_file() {
        let err = copy_file_to_clipboard(Path::new("/nonexistent/doc.md")).unwrap_err();
        assert!(matches!(err, ClipboardError::Io(_)));
    }
}
