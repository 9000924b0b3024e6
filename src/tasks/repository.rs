//! Locating, cloning, and linking the configuration repository.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use git2::Repository;

use super::{Context, Task, TaskResult};
use crate::error::BootstrapError;
use crate::exec::CommandSpec;
use crate::resources::Applicable as _;
use crate::resources::helpers::fs::occupied;
use crate::resources::symlink::SymlinkResource;

/// Where the working repository lives relative to the canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoLocation {
    /// The repository is at the canonical path (possibly freshly cloned).
    Canonical(PathBuf),
    /// The repository is elsewhere and the canonical path already leads to it.
    SymlinkedFromCanonical(PathBuf),
    /// The repository is elsewhere and nothing is at the canonical path yet.
    NeedsSymlink(PathBuf),
}

impl RepoLocation {
    /// Directory the working repository is in.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        match self {
            Self::Canonical(p)
            | Self::SymlinkedFromCanonical(p)
            | Self::NeedsSymlink(p) => p,
        }
    }
}

/// Strip a trailing `bin` component, so an executable installed in
/// `<repo>/bin` resolves to `<repo>`.
#[must_use]
pub fn candidate_dir(exe_dir: &Path) -> PathBuf {
    if exe_dir.file_name().is_some_and(|n| n == "bin")
        && let Some(parent) = exe_dir.parent()
    {
        return parent.to_path_buf();
    }
    exe_dir.to_path_buf()
}

/// Whether `dir` is a git repository with a remote URL containing `identity`.
#[must_use]
pub fn is_matching_repo(dir: &Path, identity: &str) -> bool {
    let Ok(repo) = Repository::open(dir) else {
        return false;
    };
    let Ok(names) = repo.remotes() else {
        return false;
    };
    names.iter().flatten().any(|name| {
        repo.find_remote(name)
            .ok()
            .and_then(|remote| remote.url().map(|url| url.contains(identity)))
            .unwrap_or(false)
    })
}

/// Decide where the working repository is, cloning it to the canonical
/// path when no matching repository exists.
///
/// # Errors
///
/// Returns an error if cloning fails or the canonical path is occupied by
/// something that is not the repository.
pub fn resolve(ctx: &Context) -> Result<RepoLocation> {
    let identity = &ctx.settings.repository.identity;
    let canonical = ctx.canonical_repo_dir();

    if let Some(candidate) = ctx.paths.exe_dir.as_deref().map(candidate_dir)
        && is_matching_repo(&candidate, identity)
    {
        let working = dunce::canonicalize(&candidate)
            .with_context(|| format!("resolve {}", candidate.display()))?;
        ctx.log
            .debug(&format!("running from repository {}", working.display()));
        return classify(&canonical, working, identity);
    }

    if is_matching_repo(&canonical, identity) {
        ctx.log
            .debug(&format!("found repository at {}", canonical.display()));
        return Ok(RepoLocation::Canonical(canonical));
    }

    if occupied(&canonical) {
        bail!(
            "{} exists but is not a clone of {}",
            canonical.display(),
            ctx.settings.repository.remote
        );
    }

    clone_repo(ctx, &canonical)?;
    Ok(RepoLocation::Canonical(canonical))
}

/// Place a working repository found at `working` relative to `canonical`.
///
/// A separate matching clone at `canonical` wins over the checkout; anything
/// else occupying `canonical` is an error.
fn classify(canonical: &Path, working: PathBuf, identity: &str) -> Result<RepoLocation> {
    if !occupied(canonical) {
        return Ok(RepoLocation::NeedsSymlink(working));
    }
    if dunce::canonicalize(canonical).is_ok_and(|resolved| resolved == working) {
        return Ok(
            if canonical.symlink_metadata().is_ok_and(|m| m.is_symlink()) {
                RepoLocation::SymlinkedFromCanonical(working)
            } else {
                RepoLocation::Canonical(working)
            },
        );
    }
    if is_matching_repo(canonical, identity) {
        return Ok(RepoLocation::Canonical(canonical.to_path_buf()));
    }
    bail!(
        "{} is occupied by something other than {}",
        canonical.display(),
        working.display()
    )
}

/// Clone the configured remote, with submodules, to `dest`.
fn clone_repo(ctx: &Context, dest: &Path) -> Result<()> {
    let remote = &ctx.settings.repository.remote;
    ctx.log
        .info(&format!("cloning {remote} into {}", dest.display()));

    if ctx.caps.has_vcs {
        let spec = CommandSpec::new(
            "git",
            [
                "clone".to_string(),
                "--recursive".to_string(),
                remote.clone(),
                dest.display().to_string(),
            ],
        );
        let result = ctx.executor.run_spec(&spec)?;
        if !result.success {
            bail!(
                "git clone failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        return Ok(());
    }

    ctx.log.debug("git not found, cloning with libgit2");
    let repo = git2::build::RepoBuilder::new()
        .clone(remote, dest)
        .with_context(|| format!("clone {remote}"))?;
    update_submodules(&repo)
}

/// Initialise and update every submodule, recursively.
fn update_submodules(repo: &Repository) -> Result<()> {
    for mut submodule in repo.submodules()? {
        let name = submodule.name().unwrap_or("<unnamed>").to_string();
        submodule
            .update(true, None)
            .with_context(|| format!("update submodule {name}"))?;
        let nested = submodule
            .open()
            .with_context(|| format!("open submodule {name}"))?;
        update_submodules(&nested)?;
    }
    Ok(())
}

/// Ensure the repository is present and reachable from the canonical path.
#[derive(Debug)]
pub struct BootstrapRepository;

impl Task for BootstrapRepository {
    fn name(&self) -> &'static str {
        "Bootstrap repository"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let location = resolve(ctx).map_err(|e| BootstrapError::repo(&e))?;
        let canonical = ctx.canonical_repo_dir();

        if let RepoLocation::NeedsSymlink(dir) = &location {
            SymlinkResource::new(dir.clone(), canonical.clone())
                .apply()
                .map_err(|e| BootstrapError::repo(&e))?;
            ctx.log.info(&format!(
                "linked {} -> {}",
                canonical.display(),
                dir.display()
            ));
        }
        ctx.log
            .info(&format!("repository: {}", location.working_dir().display()));
        ctx.set_repo_dir(canonical);
        Ok(TaskResult::Ok)
    }
}
