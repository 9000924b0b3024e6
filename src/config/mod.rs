//! Installer settings.
//!
//! Every value has a built-in default. An optional
//! `$XDG_CONFIG_HOME/vimfiles/settings.toml` overrides individual fields;
//! sections and keys that are absent keep their defaults.
//!
//! ```toml
//! [repository]
//! remote = "https://github.com/me/vimfiles.git"
//! identity = "me/vimfiles"
//!
//! [go]
//! packages = ["golang.org/x/tools/gopls@latest"]
//! ```
pub mod links;

use anyhow::{Context as _, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Where the configuration repository comes from and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    /// Clone URL used when no matching repository is found locally.
    pub remote: String,
    /// Substring a configured remote URL must contain for a directory to
    /// count as this repository.
    pub identity: String,
    /// Directory name of the canonical location under `$HOME`.
    pub dir_name: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            remote: "https://github.com/vimfiles/vimfiles.git".to_string(),
            identity: "vimfiles/vimfiles".to_string(),
            dir_name: ".vim".to_string(),
        }
    }
}

/// A release asset fetched during the Neovim step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Name of the installed binary.
    pub name: String,
    /// Asset URL; `{target}` is replaced by the host target triple. A `.gz`
    /// suffix is a single compressed binary, `.tar.gz` an archive.
    pub url_template: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            name: "rust-analyzer".to_string(),
            url_template: "https://github.com/rust-lang/rust-analyzer/releases/latest/download/rust-analyzer-{target}.gz".to_string(),
        }
    }
}

impl DownloadSettings {
    /// Expand the URL template for `target`.
    #[must_use]
    pub fn url_for(&self, target: &str) -> String {
        self.url_template.replace("{target}", target)
    }
}

/// Tools installed when Neovim is present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NeovimSettings {
    /// Global npm packages used by Neovim integrations.
    pub npm_tools: Vec<String>,
    /// Binary downloaded into `~/.local/bin`.
    pub download: DownloadSettings,
}

impl Default for NeovimSettings {
    fn default() -> Self {
        Self {
            npm_tools: vec![
                "neovim".to_string(),
                "typescript-language-server".to_string(),
                "vim-language-server".to_string(),
            ],
            download: DownloadSettings::default(),
        }
    }
}

/// Global npm tool installed when Node is present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NpmSettings {
    pub tool: String,
}

impl Default for NpmSettings {
    fn default() -> Self {
        Self {
            tool: "prettier".to_string(),
        }
    }
}

/// Go packages installed with `go install`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GoSettings {
    pub packages: Vec<String>,
}

impl Default for GoSettings {
    fn default() -> Self {
        Self {
            packages: vec![
                "golang.org/x/tools/gopls@latest".to_string(),
                "golang.org/x/tools/cmd/goimports@latest".to_string(),
            ],
        }
    }
}

/// Python editor bindings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PythonSettings {
    /// pip package providing the bindings.
    pub bindings: String,
    /// pip package replaced by the OS package on pacman hosts.
    pub native_dep: String,
    /// pacman package providing `native_dep`.
    pub os_package: String,
}

impl Default for PythonSettings {
    fn default() -> Self {
        Self {
            bindings: "pynvim".to_string(),
            native_dep: "greenlet".to_string(),
            os_package: "python-greenlet".to_string(),
        }
    }
}

/// All installer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repository: RepositorySettings,
    pub neovim: NeovimSettings,
    pub npm: NpmSettings,
    pub go: GoSettings,
    pub python: PythonSettings,
}

impl Settings {
    /// Path of the optional settings file under `config_home`.
    #[must_use]
    pub fn path(config_home: &Path) -> PathBuf {
        config_home.join("vimfiles").join("settings.toml")
    }

    /// Load settings, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(config_home: &Path) -> Result<Self> {
        load_toml(&Self::path(config_home))
    }
}

/// Deserialize a TOML file, treating a missing file as empty.
fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return toml::from_str("").context("Failed to create empty config");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
}
