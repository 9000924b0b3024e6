//! One-shot detection of optional host tooling.
use std::io::IsTerminal as _;

use crate::exec::Executor;

/// A tool whose presence changes what the installer does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Neovim, preferred over Vim when present.
    AlternateEditor,
    /// git, used for cloning.
    Vcs,
    /// Go toolchain.
    SystemsToolchain,
    /// Node's package manager.
    ScriptingToolchain,
    /// Python's package manager.
    InterpretedPackageManager,
    /// Arch Linux package manager.
    OsPackageManager,
}

impl Capability {
    /// Every capability, in probe order.
    pub const ALL: [Self; 6] = [
        Self::AlternateEditor,
        Self::Vcs,
        Self::SystemsToolchain,
        Self::ScriptingToolchain,
        Self::InterpretedPackageManager,
        Self::OsPackageManager,
    ];

    /// Program looked up on `PATH`.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::AlternateEditor => "nvim",
            Self::Vcs => "git",
            Self::SystemsToolchain => "go",
            Self::ScriptingToolchain => "npm",
            Self::InterpretedPackageManager => "pip3",
            Self::OsPackageManager => "pacman",
        }
    }
}

/// Which optional tools exist on this host. Computed once at startup.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub has_alternate_editor: bool,
    pub has_vcs: bool,
    pub has_systems_toolchain: bool,
    pub has_scripting_toolchain: bool,
    pub has_interpreted_package_manager: bool,
    pub has_os_package_manager: bool,
}

impl HostCapabilities {
    /// Probe every [`Capability`] through `executor`. Never fails; a probe
    /// that cannot find its program reports absence.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        let mut caps = Self::default();
        for cap in Capability::ALL {
            caps.set(cap, executor.which(cap.program()));
        }
        caps
    }

    /// Whether `cap` was detected.
    #[must_use]
    pub const fn has(&self, cap: Capability) -> bool {
        match cap {
            Capability::AlternateEditor => self.has_alternate_editor,
            Capability::Vcs => self.has_vcs,
            Capability::SystemsToolchain => self.has_systems_toolchain,
            Capability::ScriptingToolchain => self.has_scripting_toolchain,
            Capability::InterpretedPackageManager => self.has_interpreted_package_manager,
            Capability::OsPackageManager => self.has_os_package_manager,
        }
    }

    const fn set(&mut self, cap: Capability, present: bool) {
        match cap {
            Capability::AlternateEditor => self.has_alternate_editor = present,
            Capability::Vcs => self.has_vcs = present,
            Capability::SystemsToolchain => self.has_systems_toolchain = present,
            Capability::ScriptingToolchain => self.has_scripting_toolchain = present,
            Capability::InterpretedPackageManager => {
                self.has_interpreted_package_manager = present;
            }
            Capability::OsPackageManager => self.has_os_package_manager = present,
        }
    }

    /// Names of detected programs, for logging.
    #[must_use]
    pub fn present(&self) -> Vec<&'static str> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.has(*c))
            .map(Capability::program)
            .collect()
    }
}

/// Whether standard input is attached to a terminal.
#[must_use]
pub fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}
