//! Bounded concurrent fan-out of independent install jobs.
//!
//! Every job runs on the rayon pool with its own [`BufferedLog`]. The
//! caller blocks until all jobs finish; buffers are then flushed in
//! submission order so output from different jobs never interleaves.
use std::sync::Arc;

use anyhow::{Result, bail};
use rayon::prelude::*;

use super::Context;
use crate::logging::{BufferedLog, Log};

/// One independent unit of work inside a task.
pub trait Job: Send + Sync {
    /// Label shown next to the ✓/✗ status.
    fn name(&self) -> String;

    /// Do the work.
    ///
    /// # Errors
    ///
    /// Returns an error if the job fails. Other jobs are unaffected.
    fn run(&self, ctx: &Context) -> Result<()>;
}

/// How a single job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub name: String,
    /// `None` on success, otherwise the error chain.
    pub error: Option<String>,
}

impl JobOutcome {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Run every job concurrently and return their outcomes in submission order.
pub fn run_all(ctx: &Context, jobs: &[Box<dyn Job>]) -> Vec<JobOutcome> {
    let results: Vec<(JobOutcome, Arc<BufferedLog>)> = jobs
        .par_iter()
        .map(|job| {
            let buf = Arc::new(BufferedLog::new(Arc::clone(&ctx.log)));
            let job_ctx = ctx.with_log(Arc::clone(&buf) as Arc<dyn Log>);
            let name = job.name();
            let error = match job.run(&job_ctx) {
                Ok(()) => {
                    buf.info(&format!("✓ {name}"));
                    None
                }
                Err(e) => {
                    buf.error(&format!("✗ {name}: {e:#}"));
                    Some(format!("{e:#}"))
                }
            };
            (JobOutcome { name, error }, buf)
        })
        .collect();

    results
        .into_iter()
        .map(|(outcome, buf)| {
            buf.flush();
            outcome
        })
        .collect()
}

/// Fail if any job failed, naming the failures.
///
/// # Errors
///
/// Returns an error listing every failed job.
pub fn ensure_all_succeeded(outcomes: &[JobOutcome]) -> Result<()> {
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| !o.succeeded())
        .map(|o| o.name.as_str())
        .collect();
    if !failed.is_empty() {
        bail!("{} of {} failed: {}", failed.len(), outcomes.len(), failed.join(", "));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::make_context;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        name: &'static str,
        fail: bool,
        runs: Arc<AtomicUsize>,
    }

    impl Job for CountingJob {
        fn name(&self) -> String {
            self.name.to_string()
        }

        fn run(&self, ctx: &Context) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            ctx.log.debug(&format!("running {}", self.name));
            if self.fail {
                bail!("{} exploded", self.name);
            }
            Ok(())
        }
    }

    fn job(name: &'static str, fail: bool, runs: &Arc<AtomicUsize>) -> Box<dyn Job> {
        Box::new(CountingJob {
            name,
            fail,
            runs: Arc::clone(runs),
        })
    }

    #[test]
    fn one_failure_does_not_cancel_the_others() {
        let (ctx, _exec) = make_context(Path::new("/home/test"));
        let runs = Arc::new(AtomicUsize::new(0));
        let jobs = vec![job("a", false, &runs), job("b", true, &runs), job("c", false, &runs)];

        let outcomes = run_all(&ctx, &jobs);

        assert_eq!(runs.load(Ordering::SeqCst), 3);
        assert_eq!(
            outcomes.iter().map(|o| o.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert!(outcomes[0].succeeded());
        assert_eq!(outcomes[1].error.as_deref(), Some("b exploded"));
        assert!(outcomes[2].succeeded());
    }

    #[test]
    fn ensure_all_succeeded_names_failures() {
        let outcomes = vec![
            JobOutcome {
                name: "npm: neovim".to_string(),
                error: None,
            },
            JobOutcome {
                name: "download: rust-analyzer".to_string(),
                error: Some("404".to_string()),
            },
        ];
        let err = ensure_all_succeeded(&outcomes).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 failed: download: rust-analyzer");
        assert!(ensure_all_succeeded(&outcomes[..1]).is_ok());
    }

    #[test]
    fn no_jobs_is_success() {
        let (ctx, _exec) = make_context(Path::new("/home/test"));
        let outcomes = run_all(&ctx, &[]);
        assert!(outcomes.is_empty());
        assert!(ensure_all_succeeded(&outcomes).is_ok());
    }
}
