use std::sync::Arc;

use crate::cli::RunConfig;
use crate::config::Settings;
use crate::error::BootstrapError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::probe::HostCapabilities;
use crate::tasks::{self, Context, HostPaths};

/// Run the installer against the real host.
///
/// # Errors
///
/// Returns a [`BootstrapError`] if the environment is unusable or a
/// mandatory step fails. Optional-step failures only show in the summary.
pub fn run(run: RunConfig, log: &Arc<Logger>) -> Result<(), BootstrapError> {
    let paths = HostPaths::from_env()?;
    let settings = Settings::load(&paths.config_home).map_err(|e| BootstrapError::environment(&e))?;
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let caps = HostCapabilities::detect(executor.as_ref());

    let ctx = Context::new(
        settings,
        paths,
        run,
        caps,
        Arc::clone(log) as Arc<dyn Log>,
        executor,
    );
    let outcome = orchestrate(&ctx);
    log.print_summary();
    outcome
}

/// Execute every install step in order, stopping at the first fatal error.
///
/// # Errors
///
/// Returns the [`BootstrapError`] of the step that stopped the run.
pub fn orchestrate(ctx: &Context) -> Result<(), BootstrapError> {
    ctx.log.info(&format!(
        "vimfiles {} ({})",
        super::version(),
        ctx.platform.os
    ));
    let present = ctx.caps.present();
    ctx.log.debug(&format!(
        "detected: {}",
        if present.is_empty() {
            "none".to_string()
        } else {
            present.join(", ")
        }
    ));
    ctx.log.debug(&format!(
        "update: {}, interactive: {}",
        ctx.run.update_requested, ctx.run.interactive
    ));

    for task in tasks::all_install_tasks() {
        tasks::execute(task.as_ref(), ctx)?;
    }
    Ok(())
}
