//! Fetching release binaries over HTTP and unpacking them into place.
//!
//! The network side sits behind the [`Downloader`] trait so the install
//! path can be tested without network access.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context as _, Result};

/// Network timeout for a single asset download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches a URL to a local file.
#[cfg_attr(test, mockall::automock)]
pub trait Downloader: Send + Sync {
    /// Download `url` into `dest`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file cannot be written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from a download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server has no such asset (HTTP 404).
    #[error("asset not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] io::Error),
}

/// Errors arising from unpacking a downloaded asset.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// An archive entry would land outside the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive does not contain the expected binary.
    #[error("archive does not contain {name}")]
    MissingEntry {
        /// File name that was looked for.
        name: String,
    },
}

/// HTTP downloader using `ureq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = fs::File::create(dest)?;
        io::copy(&mut response.into_body().as_reader(), &mut file)?;
        Ok(())
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// How a release asset is packaged, judged by its URL suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Packaging {
    TarGz,
    Gz,
    Raw,
}

impl Packaging {
    fn from_url(url: &str) -> Self {
        if url.ends_with(".tar.gz") || url.ends_with(".tgz") {
            Self::TarGz
        } else if url.ends_with(".gz") {
            Self::Gz
        } else {
            Self::Raw
        }
    }
}

/// Download `url` and install it as an executable named `name` in `bin_dir`.
///
/// The asset is staged and unpacked next to its final location, then renamed
/// over it, so a failed install leaves any previous binary in place.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the download fails,
/// or the asset cannot be unpacked.
pub fn install_binary(
    downloader: &dyn Downloader,
    url: &str,
    bin_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    fs::create_dir_all(bin_dir)
        .with_context(|| format!("create directory: {}", bin_dir.display()))?;
    let staged = bin_dir.join(format!(".{name}.download"));
    let partial = bin_dir.join(format!(".{name}.partial"));
    let dest = bin_dir.join(name);

    downloader
        .fetch(url, &staged)
        .with_context(|| format!("fetch {name}"))?;
    let unpacked = unpack(Packaging::from_url(url), &staged, &partial, name);
    let _ = fs::remove_file(&staged);

    let installed = unpacked
        .with_context(|| format!("unpack {}", staged.display()))
        .and_then(|()| make_executable(&partial))
        .and_then(|()| {
            fs::rename(&partial, &dest)
                .with_context(|| format!("move into place: {}", dest.display()))
        });
    if installed.is_err() {
        let _ = fs::remove_file(&partial);
    }
    installed?;
    Ok(dest)
}

/// Unpack the staged asset `src` into the file `out`.
fn unpack(packaging: Packaging, src: &Path, out: &Path, name: &str) -> Result<(), ExtractionError> {
    match packaging {
        Packaging::Raw => {
            fs::copy(src, out)?;
        }
        Packaging::Gz => {
            let mut decoder = flate2::read::GzDecoder::new(fs::File::open(src)?);
            let mut file = fs::File::create(out)?;
            io::copy(&mut decoder, &mut file)?;
        }
        Packaging::TarGz => extract_entry(src, out, name)?,
    }
    Ok(())
}

/// Extract the first entry of a `.tar.gz` whose file name is `name` to the
/// file `out`, ignoring any leading directories.
fn extract_entry(archive_path: &Path, out: &Path, name: &str) -> Result<(), ExtractionError> {
    let decoder = flate2::read::GzDecoder::new(fs::File::open(archive_path)?);
    let mut archive = tar::Archive::new(decoder);

    for entry_result in archive.entries()? {
        let mut entry = entry_result?;
        let entry_path = entry.path()?.into_owned();
        validate_entry_path(&entry_path)?;

        if entry.header().entry_type().is_file()
            && entry_path.file_name().is_some_and(|n| n == name)
        {
            entry.unpack(out)?;
            return Ok(());
        }
    }

    Err(ExtractionError::MissingEntry {
        name: name.to_string(),
    })
}

/// Reject archive paths that are absolute or climb out via `..`.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod 755 {}", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
