use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::cli::RunConfig;
use crate::config::Settings;
use crate::download::{Downloader, HttpDownloader};
use crate::error::BootstrapError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;
use crate::probe::HostCapabilities;

/// Directories taken from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    /// `$HOME`.
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME`, or `~/.config`.
    pub config_home: PathBuf,
    /// Directory of the running executable, if it could be determined.
    pub exe_dir: Option<PathBuf>,
}

impl HostPaths {
    /// Read paths from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Environment`] if `HOME` is unset or empty.
    pub fn from_env() -> Result<Self, BootstrapError> {
        let home = std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                BootstrapError::Environment("HOME environment variable is not set".to_string())
            })?;
        let config_home = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map_or_else(|| home.join(".config"), PathBuf::from);
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Ok(Self {
            home,
            config_home,
            exe_dir,
        })
    }
}

/// Shared context for task execution.
pub struct Context {
    pub settings: Arc<Settings>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    pub paths: HostPaths,
    pub run: RunConfig,
    /// Tools found on `PATH` at startup.
    pub caps: HostCapabilities,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    pub downloader: Arc<dyn Downloader>,
    /// Directory dotfiles are linked from, set once the repository is in place.
    repo: Arc<OnceLock<PathBuf>>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("paths", &self.paths)
            .field("run", &self.run)
            .field("caps", &self.caps)
            .field("executor", &"<dyn Executor>")
            .field("downloader", &"<dyn Downloader>")
            .field("repo", &self.repo.get())
            .finish()
    }
}

impl Context {
    /// Create a context for the detected platform with the HTTP downloader.
    #[must_use]
    pub fn new(
        settings: Settings,
        paths: HostPaths,
        run: RunConfig,
        caps: HostCapabilities,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            platform: Arc::new(Platform::detect()),
            log,
            paths,
            run,
            caps,
            executor,
            downloader: Arc::new(HttpDownloader),
            repo: Arc::new(OnceLock::new()),
        }
    }

    /// Replace the platform.
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    /// Replace the downloader.
    #[must_use]
    pub fn with_downloader(mut self, downloader: Arc<dyn Downloader>) -> Self {
        self.downloader = downloader;
        self
    }

    /// Create a copy of this context with a different logger.
    ///
    /// All other fields are shared by reference. Used to give each
    /// concurrent job its own buffered logger.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            platform: Arc::clone(&self.platform),
            log,
            paths: self.paths.clone(),
            run: self.run,
            caps: self.caps,
            executor: Arc::clone(&self.executor),
            downloader: Arc::clone(&self.downloader),
            repo: Arc::clone(&self.repo),
        }
    }

    /// User's home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.paths.home
    }

    /// Where the repository is expected to live (`~/.vim`).
    #[must_use]
    pub fn canonical_repo_dir(&self) -> PathBuf {
        self.paths.home.join(&self.settings.repository.dir_name)
    }

    /// Repository root that dotfiles link into.
    ///
    /// The canonical path unless the repository task found the working
    /// repository somewhere the canonical path does not lead to.
    #[must_use]
    pub fn repo_dir(&self) -> PathBuf {
        self.repo
            .get()
            .cloned()
            .unwrap_or_else(|| self.canonical_repo_dir())
    }

    /// Record the repository root. Only the first call has an effect.
    pub fn set_repo_dir(&self, dir: PathBuf) {
        let _ = self.repo.set(dir);
    }

    /// `~/.local/bin`, where downloaded binaries go.
    #[must_use]
    pub fn local_bin_dir(&self) -> PathBuf {
        self.paths.home.join(".local").join("bin")
    }
}
