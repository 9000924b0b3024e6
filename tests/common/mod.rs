// Shared helpers for integration tests.
//
// Provides a fabricated configuration repository, an executor that records
// commands instead of spawning them, and a builder for a task context rooted
// in a temporary home directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use vimfiles_cli::cli::RunConfig;
use vimfiles_cli::config::Settings;
use vimfiles_cli::config::links::{LINKS, WRAPPER_SCRIPT};
use vimfiles_cli::download::{DownloadError, Downloader};
use vimfiles_cli::exec::{CommandSpec, ExecResult, Executor};
use vimfiles_cli::logging::{Log, Logger};
use vimfiles_cli::platform::{Arch, Os, Platform};
use vimfiles_cli::probe::HostCapabilities;
use vimfiles_cli::tasks::{Context, HostPaths};

pub const REMOTE: &str = "https://github.com/vimfiles/vimfiles.git";

/// Create a git repository at `dir` with an `origin` remote and the files
/// the installer links.
pub fn fabricate_repo(dir: &Path, remote: &str) {
    std::fs::create_dir_all(dir.join("bin")).expect("create repo dir");
    let repo = git2::Repository::init(dir).expect("init repo");
    repo.remote("origin", remote).expect("add remote");
    for (source, _) in LINKS {
        std::fs::write(dir.join(source), format!("\" {source}\n")).expect("write dotfile");
    }
    std::fs::write(dir.join(WRAPPER_SCRIPT), "#!/bin/sh\n").expect("write wrapper");
}

/// Executor that records commands. `git clone` fabricates the repository
/// at its destination; anything matching a failing prefix exits 1.
#[derive(Debug, Default)]
pub struct FakeHost {
    calls: Mutex<Vec<String>>,
    on_path: HashSet<String>,
    failing: Vec<String>,
}

impl FakeHost {
    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            on_path: tools.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for FakeHost {
    fn run_spec(&self, spec: &CommandSpec) -> anyhow::Result<ExecResult> {
        let line = std::iter::once(spec.program.as_str())
            .chain(spec.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().expect("calls lock").push(line.clone());

        let success = !self.failing.iter().any(|p| line.starts_with(p));
        if success
            && spec.program == "git"
            && spec.args.first().is_some_and(|a| a == "clone")
            && let Some(dest) = spec.args.last()
        {
            fabricate_repo(Path::new(dest), REMOTE);
        }
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success,
            code: Some(i32::from(!success)),
        })
    }

    fn which(&self, program: &str) -> bool {
        self.on_path.contains(program)
    }
}

/// Downloader that never reaches the network.
#[derive(Debug)]
pub struct Offline;

impl Downloader for Offline {
    fn fetch(&self, url: &str, _dest: &Path) -> Result<(), DownloadError> {
        Err(DownloadError::NotFound {
            url: url.to_string(),
        })
    }
}

/// Build a non-interactive Linux context around `host`.
pub fn context(home: &Path, exe_dir: Option<PathBuf>, host: &Arc<FakeHost>) -> (Context, Arc<Logger>) {
    let log = Arc::new(Logger::new("test"));
    let caps = HostCapabilities::detect(host.as_ref());
    let paths = HostPaths {
        home: home.to_path_buf(),
        config_home: home.join(".config"),
        exe_dir,
    };
    let run = RunConfig {
        update_requested: false,
        interactive: false,
    };
    let ctx = Context::new(
        Settings::default(),
        paths,
        run,
        caps,
        Arc::clone(&log) as Arc<dyn Log>,
        Arc::clone(host) as Arc<dyn Executor>,
    )
    .with_platform(Platform::new(Os::Linux, Arch::X86_64))
    .with_downloader(Arc::new(Offline));
    (ctx, log)
}

/// Every entry under `root`, sorted, with symlink targets or file contents.
pub fn tree(root: &Path) -> Vec<String> {
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let rel = path.strip_prefix(root).expect("under root").display().to_string();
        if rel.contains(".git") {
            continue;
        }
        let meta = path.symlink_metadata().expect("metadata");
        if meta.is_symlink() {
            let target = std::fs::read_link(&path).expect("read link");
            out.push(format!("{rel} -> {}", target.display()));
        } else if meta.is_dir() {
            out.push(format!("{rel}/"));
            walk(root, &path, out);
        } else {
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            out.push(format!("{rel}: {content:?}"));
        }
    }
}
