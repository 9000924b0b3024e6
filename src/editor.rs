//! Choosing the editor binary and how it is attached to the terminal.
use crate::cli::RunConfig;
use crate::config::links::INSTALL_ALL_ENV;
use crate::exec::{CommandSpec, Stream};
use crate::probe::HostCapabilities;

/// Where one output stream of the editor goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTarget {
    Terminal,
    Discard,
}

impl From<StreamTarget> for Stream {
    fn from(target: StreamTarget) -> Self {
        match target {
            StreamTarget::Terminal => Self::Inherit,
            StreamTarget::Discard => Self::Discard,
        }
    }
}

/// How the editor is launched for plugin operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInvocation {
    pub binary: &'static str,
    /// Pass `--headless` (Neovim only).
    pub headless: bool,
    pub stdout: StreamTarget,
    pub stderr: StreamTarget,
    /// Channel for the installer's own status lines. The child never shares
    /// it, so this is always the terminal.
    pub status: StreamTarget,
}

/// Pick the editor and its stream wiring for this run.
///
/// | editor | interactive | result                         |
/// |--------|-------------|--------------------------------|
/// | nvim   | yes         | terminal                       |
/// | nvim   | no          | `--headless`, terminal streams |
/// | vim    | yes         | terminal                       |
/// | vim    | no          | streams discarded              |
#[must_use]
pub const fn select(caps: &HostCapabilities, run: &RunConfig) -> EditorInvocation {
    let nvim = caps.has_alternate_editor;
    let discard = !nvim && !run.interactive;
    let stream = if discard {
        StreamTarget::Discard
    } else {
        StreamTarget::Terminal
    };
    EditorInvocation {
        binary: if nvim { "nvim" } else { "vim" },
        headless: nvim && !run.interactive,
        stdout: stream,
        stderr: stream,
        status: StreamTarget::Terminal,
    }
}

impl EditorInvocation {
    /// Build the command for running `commands` (each an `+Ex` argument).
    #[must_use]
    pub fn command<S: AsRef<str>>(&self, commands: &[S]) -> CommandSpec {
        let mut args = Vec::with_capacity(commands.len() + 1);
        if self.headless {
            args.push("--headless".to_string());
        }
        args.extend(commands.iter().map(|c| c.as_ref().to_string()));
        let spec =
            CommandSpec::new(self.binary, args).streams(self.stdout.into(), self.stderr.into());
        if self.is_interactive() {
            spec.attach_stdin()
        } else {
            spec
        }
    }

    /// Whether the editor UI is shown to the user.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.headless && self.stdout == StreamTarget::Terminal
    }
}

/// One plugin-manager sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginRequest {
    /// Update existing plugins rather than only install missing ones.
    pub update: bool,
    /// Ask the configuration to enable every optional plugin.
    pub install_all: bool,
}

impl PluginRequest {
    /// Editor commands for this request.
    #[must_use]
    pub const fn editor_commands(&self) -> [&'static str; 3] {
        let sync = if self.update {
            "+PlugUpdate"
        } else {
            "+PlugInstall"
        };
        ["+PlugClean!", sync, "+qall"]
    }

    /// Full command for `editor`, carrying the install-all entry in the
    /// child's environment only.
    #[must_use]
    pub fn command(&self, editor: &EditorInvocation) -> CommandSpec {
        let spec = editor.command(&self.editor_commands());
        if self.install_all {
            spec.env(INSTALL_ALL_ENV, "1")
        } else {
            spec
        }
    }
}
