//! Neovim configuration link and its companion tools.
use anyhow::Result;

use super::fanout::{self, Job};
use super::npm::NpmGlobalJob;
use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::download::install_binary;
use crate::resources::symlink::SymlinkResource;

/// Download a release binary for this host into `~/.local/bin`.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub name: String,
    pub url: String,
}

impl Job for DownloadJob {
    fn name(&self) -> String {
        format!("download: {}", self.name)
    }

    fn run(&self, ctx: &Context) -> Result<()> {
        ctx.log.debug(&format!("fetching {}", self.url));
        let path = install_binary(
            ctx.downloader.as_ref(),
            &self.url,
            &ctx.local_bin_dir(),
            &self.name,
        )?;
        ctx.log.debug(&format!("installed {}", path.display()));
        Ok(())
    }
}

/// Jobs for this host: one per npm tool when npm is present, plus the
/// binary download when an asset exists for the platform.
fn jobs(ctx: &Context) -> Vec<Box<dyn Job>> {
    let neovim = &ctx.settings.neovim;
    let mut jobs = Vec::<Box<dyn Job>>::new();
    if ctx.caps.has_scripting_toolchain {
        jobs.extend(neovim.npm_tools.iter().map(|package| {
            Box::new(NpmGlobalJob {
                package: package.clone(),
            }) as Box<dyn Job>
        }));
    } else {
        ctx.log.debug("npm not found, skipping Neovim npm tools");
    }
    match ctx.platform.target_triple() {
        Some(target) => jobs.push(Box::new(DownloadJob {
            name: neovim.download.name.clone(),
            url: neovim.download.url_for(target),
        })),
        None => ctx.log.debug(&format!(
            "no {} release for this platform",
            neovim.download.name
        )),
    }
    jobs
}

/// Link the Neovim config directory to the repository and install tools.
#[derive(Debug)]
pub struct ConfigureNeovim;

impl Task for ConfigureNeovim {
    fn name(&self) -> &'static str {
        "Configure Neovim"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.caps.has_alternate_editor
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let link = SymlinkResource::new(ctx.repo_dir(), ctx.paths.config_home.join("nvim"));
        let stats = process_resources(ctx, [link], &ProcessOpts::install_missing("link"))?;
        ctx.log.debug(&stats.summary());

        let outcomes = fanout::run_all(ctx, &jobs(ctx));
        fanout::ensure_all_succeeded(&outcomes)?;
        ctx.log
            .info(&format!("{} tool(s) installed", outcomes.len()));
        Ok(TaskResult::Ok)
    }
}
