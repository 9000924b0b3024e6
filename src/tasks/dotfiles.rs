//! Home-directory links, local-override placeholders, and the wrapper script.
use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::config::links::{LEGACY_BUNDLE_DIR, LINKS, LOCAL_OVERRIDES, WRAPPER_SCRIPT};
use crate::resources::helpers::fs::recreate_dir;
use crate::resources::placeholder::PlaceholderResource;
use crate::resources::symlink::SymlinkResource;

/// Create placeholders, link dotfiles into `$HOME`, and reset the legacy
/// bundle directory.
#[derive(Debug)]
pub struct LinkDotfiles;

impl Task for LinkDotfiles {
    fn name(&self) -> &'static str {
        "Link dotfiles"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let home = ctx.home();
        let repo = ctx.repo_dir();

        let placeholders = LOCAL_OVERRIDES
            .iter()
            .map(|name| PlaceholderResource::new(home.join(name)));
        let mut stats = process_resources(
            ctx,
            placeholders,
            &ProcessOpts::install_missing("create"),
        )?;

        let links = LINKS
            .iter()
            .map(|(source, target)| SymlinkResource::new(repo.join(source), home.join(target)));
        stats += process_resources(ctx, links, &ProcessOpts::install_missing("link"))?;

        let bundle = repo.join(LEGACY_BUNDLE_DIR);
        recreate_dir(&bundle)?;
        ctx.log.debug(&format!("reset {}", bundle.display()));

        Ok(stats.finish(ctx))
    }
}

/// Link `<repo>/bin/vimfiles` into the per-OS install directory.
#[derive(Debug)]
pub struct LinkWrapperScript;

impl Task for LinkWrapperScript {
    fn name(&self) -> &'static str {
        "Link wrapper script"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.platform.wrapper_install_dir(ctx.home()).is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(dir) = ctx.platform.wrapper_install_dir(ctx.home()) else {
            return Ok(TaskResult::Skipped("no install directory".to_string()));
        };
        let link = SymlinkResource::new(ctx.repo_dir().join(WRAPPER_SCRIPT), dir.join("vimfiles"));
        let stats = process_resources(ctx, [link], &ProcessOpts::apply_all("link").no_bail())?;
        Ok(stats.finish(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Os, Platform};
    use crate::tasks::test_helpers::make_context;
    use std::fs;
    use std::path::Path;

    fn seed_repo(home: &Path) {
        let repo = home.join(".vim");
        fs::create_dir_all(repo.join("bin")).unwrap();
        for (source, _) in LINKS {
            fs::write(repo.join(source), format!("\" {source}\n")).unwrap();
        }
        fs::write(repo.join(WRAPPER_SCRIPT), "#!/bin/sh\n").unwrap();
    }

    #[test]
    fn fresh_home_gets_links_and_placeholders() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        let (ctx, _exec) = make_context(home);

        LinkDotfiles.run(&ctx).unwrap();

        for (source, target) in LINKS {
            assert_eq!(fs::read_link(home.join(target)).unwrap(), home.join(".vim").join(source));
        }
        for name in LOCAL_OVERRIDES {
            assert_eq!(fs::read_to_string(home.join(name)).unwrap(), "");
        }
        assert!(home.join(".vim/bundle").is_dir());
    }

    #[test]
    fn existing_regular_file_is_left_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        fs::write(home.join(".vimrc"), "set nocompatible\n").unwrap();
        let (ctx, _exec) = make_context(home);

        assert_eq!(LinkDotfiles.run(&ctx).unwrap(), TaskResult::Ok);
        assert_eq!(fs::read_to_string(home.join(".vimrc")).unwrap(), "set nocompatible\n");
        assert!(!home.join(".vimrc").symlink_metadata().unwrap().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn foreign_symlink_is_left_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        std::os::unix::fs::symlink("/etc/vimrc", home.join(".vimrc")).unwrap();
        let (ctx, _exec) = make_context(home);

        LinkDotfiles.run(&ctx).unwrap();
        assert_eq!(fs::read_link(home.join(".vimrc")).unwrap(), Path::new("/etc/vimrc"));
    }

    #[test]
    fn placeholder_content_survives() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        fs::write(home.join(".vimrc.local"), "let g:theme = 'dark'\n").unwrap();
        let (ctx, _exec) = make_context(home);

        LinkDotfiles.run(&ctx).unwrap();
        assert_eq!(
            fs::read_to_string(home.join(".vimrc.local")).unwrap(),
            "let g:theme = 'dark'\n"
        );
    }

    #[test]
    fn bundle_directory_is_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        fs::create_dir_all(home.join(".vim/bundle/old-plugin")).unwrap();
        let (ctx, _exec) = make_context(home);

        LinkDotfiles.run(&ctx).unwrap();
        assert!(home.join(".vim/bundle").is_dir());
        assert_eq!(fs::read_dir(home.join(".vim/bundle")).unwrap().count(), 0);
    }

    #[test]
    fn second_run_changes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        let (ctx, _exec) = make_context(home);

        LinkDotfiles.run(&ctx).unwrap();
        let first: Vec<_> = LINKS
            .iter()
            .map(|(_, t)| fs::read_link(home.join(t)).unwrap())
            .collect();
        LinkDotfiles.run(&ctx).unwrap();
        let second: Vec<_> = LINKS
            .iter()
            .map(|(_, t)| fs::read_link(home.join(t)).unwrap())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn wrapper_is_linked_into_local_bin_on_linux() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        let (ctx, _exec) = make_context(home);

        assert!(LinkWrapperScript.should_run(&ctx));
        LinkWrapperScript.run(&ctx).unwrap();
        assert_eq!(
            fs::read_link(home.join(".local/bin/vimfiles")).unwrap(),
            home.join(".vim").join(WRAPPER_SCRIPT)
        );
    }

    #[cfg(unix)]
    #[test]
    fn stale_wrapper_symlink_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        fs::create_dir_all(home.join(".local/bin")).unwrap();
        let stale = home.join("old-vimfiles");
        fs::write(&stale, "").unwrap();
        std::os::unix::fs::symlink(&stale, home.join(".local/bin/vimfiles")).unwrap();
        let (ctx, _exec) = make_context(home);

        LinkWrapperScript.run(&ctx).unwrap();
        assert_eq!(
            fs::read_link(home.join(".local/bin/vimfiles")).unwrap(),
            home.join(".vim").join(WRAPPER_SCRIPT)
        );
    }

    #[test]
    fn wrapper_regular_file_is_never_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path();
        seed_repo(home);
        fs::create_dir_all(home.join(".local/bin")).unwrap();
        fs::write(home.join(".local/bin/vimfiles"), "custom").unwrap();
        let (ctx, _exec) = make_context(home);

        LinkWrapperScript.run(&ctx).unwrap();
        assert_eq!(fs::read_to_string(home.join(".local/bin/vimfiles")).unwrap(), "custom");
    }

    #[test]
    fn wrapper_not_applicable_on_windows() {
        let (ctx, _exec) = make_context(Path::new("/home/test"));
        let ctx = ctx.with_platform(Platform::new(Os::Windows, Arch::X86_64));
        assert!(!LinkWrapperScript.should_run(&ctx));
    }
}
