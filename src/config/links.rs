//! Fixed file layout linked from the repository into the home directory.

/// `(repository file, home-relative link)` pairs.
pub const LINKS: &[(&str, &str)] = &[
    ("vimrc", ".vimrc"),
    ("gvimrc", ".gvimrc"),
    ("vimrc.bundles", ".vimrc.bundles"),
];

/// Empty local-override files created in `$HOME` when absent.
pub const LOCAL_OVERRIDES: &[&str] = &[".vimrc.local", ".vimrc.bundles.local", ".gvimrc.local"];

/// Plugin directory left behind by older plugin managers; always reset.
pub const LEGACY_BUNDLE_DIR: &str = "bundle";

/// Wrapper script inside the repository, relative to its root.
pub const WRAPPER_SCRIPT: &str = "bin/vimfiles";

/// Environment entry telling the editor configuration to enable every
/// optional plugin during a sync.
pub const INSTALL_ALL_ENV: &str = "VIMFILES_INSTALL_ALL";
