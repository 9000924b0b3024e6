//! Fatal error types for the bootstrapper.
//!
//! Only failures that must stop the whole run live here. Everything else
//! inside a task is an [`anyhow::Error`] that the task executor logs and
//! records without escalating.
//!
//! # Error hierarchy
//!
//! ```text
//! BootstrapError
//! ├── Usage               : unknown or malformed command-line flags
//! ├── RepoAcquisition     : clone / canonical symlink failure
//! ├── MissingPrerequisite : a mandatory tool is not on PATH
//! └── Environment         : HOME unset, unreadable settings, ...
//! ```

use std::process::ExitCode;

use thiserror::Error;

/// An error that aborts the run with a specific exit code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    /// Command-line arguments could not be parsed.
    #[error("{0}")]
    Usage(String),

    /// The configuration repository could not be cloned or linked into place.
    #[error("Repository acquisition failed: {0}")]
    RepoAcquisition(String),

    /// A tool required by a mandatory step is not installed.
    #[error("Required prerequisite '{tool}' not found: {hint}")]
    MissingPrerequisite {
        /// Program name that was looked up on `PATH`.
        tool: String,
        /// What the user should install to fix it.
        hint: String,
    },

    /// The process environment is unusable.
    #[error("Environment error: {0}")]
    Environment(String),
}

impl BootstrapError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Usage(_) => 1,
            Self::RepoAcquisition(_) => 2,
            Self::MissingPrerequisite { .. } => 3,
            Self::Environment(_) => 4,
        }
    }

    /// Convert into a process [`ExitCode`].
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Wrap any error as a repository acquisition failure, keeping its context chain.
    pub fn repo(err: &anyhow::Error) -> Self {
        Self::RepoAcquisition(format!("{err:#}"))
    }

    /// Wrap any error as an environment failure, keeping its context chain.
    pub fn environment(err: &anyhow::Error) -> Self {
        Self::Environment(format!("{err:#}"))
    }
}
