//! Go editor tooling.
use anyhow::{Result, bail};

use super::{Context, Task, TaskResult};

/// `go install` each configured package.
///
/// Every package is attempted; the task fails afterwards if any did.
#[derive(Debug)]
pub struct InstallGoTools;

impl Task for InstallGoTools {
    fn name(&self) -> &'static str {
        "Install Go tools"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.caps.has_systems_toolchain
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let packages = &ctx.settings.go.packages;
        let mut failed = Vec::new();
        for package in packages {
            match ctx.executor.run("go", &["install", package]) {
                Ok(_) => ctx.log.info(&format!("✓ {package}")),
                Err(e) => {
                    ctx.log.warn(&format!("✗ {package}: {e:#}"));
                    failed.push(package.as_str());
                }
            }
        }
        if !failed.is_empty() {
            bail!(
                "{} of {} failed: {}",
                failed.len(),
                packages.len(),
                failed.join(", ")
            );
        }
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::{RecordingExecutor, make_context, make_context_with};
    use std::path::Path;

    #[test]
    fn not_applicable_without_go() {
        let (ctx, _exec) = make_context(Path::new("/home/test"));
        assert!(!InstallGoTools.should_run(&ctx));
    }

    #[test]
    fn installs_each_package() {
        let (ctx, exec, _log) =
            make_context_with(Path::new("/home/test"), RecordingExecutor::new().on_path(&["go"]));
        InstallGoTools.run(&ctx).unwrap();
        assert_eq!(
            exec.lines(),
            vec![
                "go install golang.org/x/tools/gopls@latest",
                "go install golang.org/x/tools/cmd/goimports@latest",
            ]
        );
    }

    #[test]
    fn one_failure_still_attempts_the_rest() {
        let (ctx, exec, _log) = make_context_with(
            Path::new("/home/test"),
            RecordingExecutor::new()
                .on_path(&["go"])
                .failing("go install golang.org/x/tools/gopls"),
        );
        let err = InstallGoTools.run(&ctx).unwrap_err();
        assert_eq!(exec.calls().len(), 2);
        assert!(err.to_string().contains("gopls"));
        assert!(!err.to_string().contains("goimports"));
    }
}
