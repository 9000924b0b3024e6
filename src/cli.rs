use clap::Parser;

/// Bootstrap a Vim/Neovim environment from the vimfiles repository.
// Only `-u` and `-n` drive a run. clap's `-h`/`--help` and `-V`/`--version`
// are kept as informational exits with status 0; every other token is a
// usage error.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "vimfiles",
    about = "Bootstrap a Vim/Neovim environment",
    version = option_env!("VIMFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Update installed plugins instead of only installing missing ones
    #[arg(short, long)]
    pub update: bool,

    /// Run the editor without a UI and keep its output off the terminal
    #[arg(short, long)]
    pub non_interactive: bool,
}

/// Resolved run mode. Built once before any task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub update_requested: bool,
    pub interactive: bool,
}

impl RunConfig {
    /// Combine parsed flags with the terminal state of standard input.
    ///
    /// A non-terminal stdin always disables interactivity. The second value
    /// is `true` when that overrode what the flags asked for, so the caller
    /// can tell the user.
    #[must_use]
    pub const fn resolve(cli: &Cli, stdin_is_terminal: bool) -> (Self, bool) {
        let forced = !stdin_is_terminal && !cli.non_interactive;
        let config = Self {
            update_requested: cli.update,
            interactive: stdin_is_terminal && !cli.non_interactive,
        };
        (config, forced)
    }
}
