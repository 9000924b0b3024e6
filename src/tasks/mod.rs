//! Named install steps, executed in a fixed order.
pub mod context;
pub mod dotfiles;
pub mod fanout;
pub mod go_tools;
pub mod neovim;
pub mod npm;
pub mod plugins;
mod processing;
pub mod python;
pub mod repository;

pub use context::{Context, HostPaths};
pub use processing::{ProcessOpts, TaskResult, TaskStats, process_resources};

use anyhow::Result;

use crate::error::BootstrapError;
use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the host. Tasks that return `false` are
    /// recorded as not applicable without running.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// Returning a [`BootstrapError`] (through [`anyhow`]) stops the whole
    /// run; any other error marks only this task as failed.
    ///
    /// # Errors
    ///
    /// Returns an error if a command fails, a file cannot be written, or a
    /// mandatory prerequisite is missing.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Every install step, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(repository::BootstrapRepository),
        Box::new(dotfiles::LinkDotfiles),
        Box::new(dotfiles::LinkWrapperScript),
        Box::new(neovim::ConfigureNeovim),
        Box::new(npm::InstallNpmTool),
        Box::new(go_tools::InstallGoTools),
        Box::new(python::InstallPythonBindings),
        Box::new(plugins::SyncPlugins),
        Box::new(plugins::RegisterRemotePlugins),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's [`BootstrapError`] if it failed fatally. Other
/// failures are logged and recorded, and the run continues.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<(), BootstrapError> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            if let Some(fatal) = e.downcast_ref::<BootstrapError>() {
                return Err(fatal.clone());
            }
        }
    }
    Ok(())
}


#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::path::Path;
    use test_helpers::{RecordingExecutor, make_context_with};

    /// A mock task for testing `execute()`.
    struct MockTask {
        should_run: bool,
        result: fn() -> Result<TaskResult>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            "mock task"
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            (self.result)()
        }
    }

    fn status_of(task: &MockTask) -> (Result<(), BootstrapError>, TaskStatus) {
        let (ctx, _exec, log) = make_context_with(Path::new("/home/test"), RecordingExecutor::new());
        let outcome = execute(task, &ctx);
        let entries = log.task_entries();
        assert_eq!(entries.len(), 1);
        (outcome, entries[0].status)
    }

    #[test]
    fn non_applicable_task_is_recorded_without_running() {
        let task = MockTask {
            should_run: false,
            result: || panic!("must not run"),
        };
        let (outcome, status) = status_of(&task);
        assert!(outcome.is_ok());
        assert_eq!(status, TaskStatus::NotApplicable);
    }

    #[test]
    fn ok_task_is_recorded() {
        let task = MockTask {
            should_run: true,
            result: || Ok(TaskResult::Ok),
        };
        assert_eq!(status_of(&task).1, TaskStatus::Ok);
    }

    #[test]
    fn skipped_task_is_recorded() {
        let task = MockTask {
            should_run: true,
            result: || Ok(TaskResult::Skipped("nothing to do".to_string())),
        };
        assert_eq!(status_of(&task).1, TaskStatus::Skipped);
    }

    #[test]
    fn ordinary_failure_does_not_stop_the_run() {
        let task = MockTask {
            should_run: true,
            result: || anyhow::bail!("npm exited 1"),
        };
        let (outcome, status) = status_of(&task);
        assert!(outcome.is_ok());
        assert_eq!(status, TaskStatus::Failed);
    }

    #[test]
    fn bootstrap_error_escalates() {
        let task = MockTask {
            should_run: true,
            result: || {
                Err(BootstrapError::MissingPrerequisite {
                    tool: "pip3".to_string(),
                    hint: "install pip".to_string(),
                }
                .into())
            },
        };
        let (outcome, status) = status_of(&task);
        assert_eq!(outcome.unwrap_err().code(), 3);
        assert_eq!(status, TaskStatus::Failed);
    }

    #[test]
    fn bootstrap_error_with_context_still_escalates() {
        let task = MockTask {
            should_run: true,
            result: || {
                Err(anyhow::Error::from(BootstrapError::RepoAcquisition(
                    "clone failed".to_string(),
                ))
                .context("while bootstrapping"))
            },
        };
        assert_eq!(status_of(&task).0.unwrap_err().code(), 2);
    }

    #[test]
    fn install_tasks_run_in_fixed_order() {
        let names: Vec<String> = all_install_tasks()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("Bootstrap repository"));
        assert_eq!(names.last().map(String::as_str), Some("Register remote plugins"));
        let python = names.iter().position(|n| n == "Install Python bindings").unwrap();
        let sync = names.iter().position(|n| n == "Sync plugins").unwrap();
        assert!(python < sync);
    }
}
