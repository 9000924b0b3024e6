//! Plugin-manager sync and remote plugin registration.
use anyhow::{Result, bail};

use super::{Context, Task, TaskResult};
use crate::editor::{EditorInvocation, PluginRequest, select};
use crate::exec::CommandSpec;

/// Run an editor command and fail on a non-zero exit.
fn run_editor(ctx: &Context, editor: &EditorInvocation, spec: &CommandSpec) -> Result<()> {
    if editor.is_interactive() {
        ctx.log.info(&format!("opening {}", editor.binary));
    }
    let result = ctx.executor.run_spec(spec)?;
    if !result.success {
        bail!(
            "{} exited with status {}",
            editor.binary,
            result
                .code
                .map_or_else(|| "unknown".to_string(), |c| c.to_string())
        );
    }
    Ok(())
}

/// Clean, then install or update plugins through the plugin manager.
#[derive(Debug)]
pub struct SyncPlugins;

impl Task for SyncPlugins {
    fn name(&self) -> &'static str {
        "Sync plugins"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let editor = select(&ctx.caps, &ctx.run);
        let request = PluginRequest {
            update: ctx.run.update_requested,
            install_all: true,
        };
        ctx.log.debug(&format!(
            "{} plugins with {}",
            if request.update { "updating" } else { "installing" },
            editor.binary
        ));
        run_editor(ctx, &editor, &request.command(&editor))?;
        Ok(TaskResult::Ok)
    }
}

/// Regenerate Neovim's remote plugin manifest.
#[derive(Debug)]
pub struct RegisterRemotePlugins;

impl Task for RegisterRemotePlugins {
    fn name(&self) -> &'static str {
        "Register remote plugins"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.caps.has_alternate_editor
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let editor = select(&ctx.caps, &ctx.run);
        let spec = editor.command(&["+UpdateRemotePlugins", "+qall"]);
        run_editor(ctx, &editor, &spec)?;
        Ok(TaskResult::Ok)
    }
}
