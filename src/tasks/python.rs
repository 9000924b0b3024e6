//! Python bindings for the editor.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::error::BootstrapError;
use crate::probe::Capability;

/// Install or upgrade the Python editor bindings.
///
/// `pip3` is required. On pacman hosts the pip-built native dependency is
/// swapped for the distribution package first.
#[derive(Debug)]
pub struct InstallPythonBindings;

impl Task for InstallPythonBindings {
    fn name(&self) -> &'static str {
        "Install Python bindings"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let pip = Capability::InterpretedPackageManager.program();
        if !ctx.caps.has_interpreted_package_manager {
            return Err(BootstrapError::MissingPrerequisite {
                tool: pip.to_string(),
                hint: "install Python 3 and pip (e.g. python3-pip)".to_string(),
            }
            .into());
        }

        let python = &ctx.settings.python;
        if ctx.caps.has_os_package_manager {
            let removed =
                ctx.executor
                    .run_unchecked("sudo", &[pip, "uninstall", "-y", &python.native_dep]);
            if let Ok(result) = removed
                && !result.success
            {
                ctx.log
                    .debug(&format!("{} was not installed via pip", python.native_dep));
            }
            ctx.executor
                .run("sudo", &["pacman", "-S", "--noconfirm", &python.os_package])
                .with_context(|| format!("install {}", python.os_package))?;
        }

        ctx.executor
            .run(pip, &["install", "--user", "--upgrade", &python.bindings])
            .with_context(|| format!("install {}", python.bindings))?;
        ctx.log.info(&format!("{} up to date", python.bindings));
        Ok(TaskResult::Ok)
    }
}
