//! Empty local-override file resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{ensure_parent_dir, occupied};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// An empty file that is created once and never rewritten.
#[derive(Debug, Clone)]
pub struct PlaceholderResource {
    pub path: PathBuf,
}

impl PlaceholderResource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Applicable for PlaceholderResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.path)?;
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(ResourceChange::Applied),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Ok(ResourceChange::AlreadyCorrect)
            }
            Err(e) => Err(e).with_context(|| format!("create {}", self.path.display())),
        }
    }
}

impl Resource for PlaceholderResource {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(if occupied(&self.path) {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}
