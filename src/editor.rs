use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("scratch file error: {0}")]
    Io(#[from] io::Error),
    #[error("editor `{0}` not found")]
    NotFound(String),
    #[error("editor `{program}` exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
    #[error("no editor configured")]
    EmptyCommand,
}

/// Runs the user's editor on a scratch file.
#[derive(Debug, Clone)]
pub struct Editor {
    command: String,
    scratch_dir: Option<PathBuf>,
}

impl Editor {
    /// `command` may carry arguments, e.g. `code --wait`.
    ///
    /// The command is split on whitespace without shell quoting, so an editor
    /// whose path contains spaces has to be reachable through `PATH` or a
    /// symlink instead.
    pub fn new(command: impl Into<String>) -> Self {
        Editor {
            command: command.into(),
            scratch_dir: None,
        }
    }

    /// Creates scratch files in `dir` instead of the system temp directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Opens `seed` in the editor and returns the file contents once it exits.
    ///
    /// The scratch file is removed before returning, whether or not the editor
    /// succeeded.
    pub fn edit(&self, seed: &str) -> Result<Vec<u8>, EditorError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("gissue-").suffix(".md");
        let mut scratch = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        let edited = scratch
            .write_all(seed.as_bytes())
            .and_then(|()| scratch.flush())
            .map_err(EditorError::from)
            .and_then(|()| self.run_on(scratch.path()));

        let released = scratch.close();
        let bytes = edited?;
        released?;
        Ok(bytes)
    }

    fn run_on(&self, path: &Path) -> Result<Vec<u8>, EditorError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or(EditorError::EmptyCommand)?;

        tracing::debug!(program, path = %path.display(), "launching editor");
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => EditorError::NotFound(program.to_string()),
                _ => EditorError::Io(e),
            })?;

        if !status.success() {
            return Err(EditorError::ExitStatus {
                program: program.to_string(),
                status,
            });
        }

        Ok(std::fs::read(path)?)
    }
}
