use std::fmt;
use std::path::{Path, PathBuf};

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// CPU architecture of the host, as far as release assets care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
    Other,
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: Self::detect_arch(),
        }
    }

    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Rust-style target triple used to pick platform-specific release assets.
    ///
    /// Returns `None` for combinations no asset is published for.
    #[must_use]
    pub const fn target_triple(&self) -> Option<&'static str> {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X86_64) => Some("x86_64-unknown-linux-gnu"),
            (Os::Linux, Arch::Aarch64) => Some("aarch64-unknown-linux-gnu"),
            (Os::MacOs, Arch::X86_64) => Some("x86_64-apple-darwin"),
            (Os::MacOs, Arch::Aarch64) => Some("aarch64-apple-darwin"),
            _ => None,
        }
    }

    /// Directory the wrapper script is linked into.
    ///
    /// Linux keeps it per-user; macOS uses the Homebrew-era system prefix.
    #[must_use]
    pub fn wrapper_install_dir(&self, home: &Path) -> Option<PathBuf> {
        match self.os {
            Os::Linux => Some(home.join(".local").join("bin")),
            Os::MacOs => Some(PathBuf::from("/usr/local/bin")),
            Os::Windows | Os::Other => None,
        }
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            Os::Other
        }
    }

    const fn detect_arch() -> Arch {
        if cfg!(target_arch = "x86_64") {
            Arch::X86_64
        } else if cfg!(target_arch = "aarch64") {
            Arch::Aarch64
        } else {
            Arch::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_detect_matches_cfg() {
        let p = Platform::detect();
        if cfg!(target_os = "linux") {
            assert_eq!(p.os, Os::Linux);
        }
        if cfg!(target_os = "macos") {
            assert_eq!(p.os, Os::MacOs);
        }
    }

    #[test]
    fn target_triple_linux_x86_64() {
        let p = Platform::new(Os::Linux, Arch::X86_64);
        assert_eq!(p.target_triple(), Some("x86_64-unknown-linux-gnu"));
    }

    #[test]
    fn target_triple_macos_arm() {
        let p = Platform::new(Os::MacOs, Arch::Aarch64);
        assert_eq!(p.target_triple(), Some("aarch64-apple-darwin"));
    }

    #[test]
    fn target_triple_unsupported() {
        assert_eq!(Platform::new(Os::Windows, Arch::X86_64).target_triple(), None);
        assert_eq!(Platform::new(Os::Linux, Arch::Other).target_triple(), None);
    }

    #[test]
    fn wrapper_dir_per_os() {
        let home = Path::new("/home/test");
        assert_eq!(
            Platform::new(Os::Linux, Arch::X86_64).wrapper_install_dir(home),
            Some(PathBuf::from("/home/test/.local/bin"))
        );
        assert_eq!(
            Platform::new(Os::MacOs, Arch::Aarch64).wrapper_install_dir(home),
            Some(PathBuf::from("/usr/local/bin"))
        );
        assert_eq!(
            Platform::new(Os::Windows, Arch::X86_64).wrapper_install_dir(home),
            None
        );
    }

    #[test]
    fn os_display() {
        assert_eq!(Os::Linux.to_string(), "linux");
        assert_eq!(Os::MacOs.to_string(), "macos");
    }
}
