//! Global npm tools.
use anyhow::{Context as _, Result};

use super::fanout::Job;
use super::{Context, Task, TaskResult};

/// Run `npm install -g <package>`.
///
/// # Errors
///
/// Returns an error if npm cannot be spawned or exits non-zero.
pub fn install_global(ctx: &Context, package: &str) -> Result<()> {
    ctx.log.debug(&format!("npm install -g {package}"));
    ctx.executor
        .run("npm", &["install", "-g", package])
        .with_context(|| format!("install npm package {package}"))?;
    Ok(())
}

/// A single global npm package, as a fan-out job.
#[derive(Debug, Clone)]
pub struct NpmGlobalJob {
    pub package: String,
}

impl Job for NpmGlobalJob {
    fn name(&self) -> String {
        format!("npm: {}", self.package)
    }

    fn run(&self, ctx: &Context) -> Result<()> {
        install_global(ctx, &self.package)
    }
}

/// Install the configured standalone npm tool.
#[derive(Debug)]
pub struct InstallNpmTool;

impl Task for InstallNpmTool {
    fn name(&self) -> &'static str {
        "Install npm tool"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.caps.has_scripting_toolchain
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let tool = &ctx.settings.npm.tool;
        install_global(ctx, tool)?;
        ctx.log.info(&format!("installed {tool}"));
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::execute;
    use crate::tasks::test_helpers::{RecordingExecutor, make_context, make_context_with};
    use std::path::Path;

    #[test]
    fn not_applicable_without_npm() {
        let (ctx, exec) = make_context(Path::new("/home/test"));
        assert!(!InstallNpmTool.should_run(&ctx));
        execute(&InstallNpmTool, &ctx).unwrap();
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn installs_configured_tool() {
        let (ctx, exec, _log) =
            make_context_with(Path::new("/home/test"), RecordingExecutor::new().on_path(&["npm"]));
        assert_eq!(InstallNpmTool.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(exec.lines(), vec!["npm install -g prettier"]);
    }

    #[test]
    fn npm_failure_is_an_ordinary_error() {
        let (ctx, _exec, _log) = make_context_with(
            Path::new("/home/test"),
            RecordingExecutor::new()
                .on_path(&["npm"])
                .failing("npm install"),
        );
        let err = InstallNpmTool.run(&ctx).unwrap_err();
        assert!(err.downcast_ref::<crate::error::BootstrapError>().is_none());
        assert!(execute(&InstallNpmTool, &ctx).is_ok());
    }

    #[test]
    fn job_name_includes_package() {
        let job = NpmGlobalJob {
            package: "neovim".to_string(),
        };
        assert_eq!(job.name(), "npm: neovim");
    }
}
