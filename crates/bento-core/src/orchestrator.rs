//! Run orchestration
//!
//! Collects the candidate file set, matches every checker scope against each
//! file, fans one task out per `(file, linter)` pair, and aggregates the
//! results: notices sort deterministically within a file, files deliver in
//! original enumeration order through the reorder buffer, and the whole run
//! reduces to one worst-case severity.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapter::{Adapter, AdapterContext};
use crate::config::{NormalizedConfig, ReporterSpec};
use crate::flatten::flatten;
use crate::notice::{FileReport, Notice, overall_severity};
use crate::pattern::{Pattern, PatternMatch, match_path};
use crate::reorder::ReorderBuffer;
use crate::result::Result;
use crate::severity::Severity;
use crate::walk::walk;

/// Aggregated result of one run.
#[derive(Debug)]
pub struct RunOutcome {
    /// One entry per enumerated file, in input order
    pub files: Vec<(PathBuf, FileReport)>,
    /// Most severe notice severity across all analyzed files; `None` when no
    /// notices exist (or nothing was analyzed), which is not the same as `Off`
    pub overall: Option<Severity>,
}

/// Drives a full run over one normalized configuration.
pub struct Orchestrator {
    config: NormalizedConfig,
    root: PathBuf,
    concurrency: usize,
}

/// One unit of dispatch: a single linter invocation against a single file.
struct Task {
    file_index: usize,
    file: PathBuf,
    linter: String,
    adapter: Arc<dyn Adapter>,
    fix: bool,
    level: Severity,
    options: Value,
}

impl Orchestrator {
    /// Create an orchestrator rooted at `root`.
    pub fn new(config: NormalizedConfig, root: impl Into<PathBuf>) -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self {
            config,
            root: root.into(),
            concurrency,
        }
    }

    /// Bound the number of concurrently running tasks.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run the configured checkers over `bases` (empty = the root itself),
    /// delivering per-file reports to every configured reporter in input
    /// order and returning the aggregated outcome.
    pub async fn run(&mut self, bases: &[PathBuf]) -> Result<RunOutcome> {
        let checkers = flatten(&self.config)?;
        let top_patterns = Pattern::compile_all(&self.config.patterns)?;

        let files = walk(bases, &top_patterns, &self.root)?;
        info!("collected {} candidate file(s)", files.len());

        // Match every checker (and its overrides) against every file. An
        // override that matched supersedes its checker's linter list for
        // that file; all matching scopes contribute.
        let mut tasks: Vec<Task> = Vec::new();
        let mut task_counts = vec![0usize; files.len()];
        let mut applied = vec![false; files.len()];
        for (index, file) in files.iter().enumerate() {
            for checker in &checkers {
                let matched_overrides: Vec<_> = checker
                    .overrides
                    .iter()
                    .filter(|o| o.applies(file, &self.root))
                    .collect();

                let linters: Vec<_> = if !matched_overrides.is_empty() {
                    applied[index] = true;
                    matched_overrides
                        .iter()
                        .flat_map(|o| o.linters.iter())
                        .collect()
                } else if match_path(&checker.patterns, file, false, &self.root)
                    == PatternMatch::Matched
                {
                    applied[index] = true;
                    checker.linters.iter().collect()
                } else {
                    continue;
                };

                for linter in linters {
                    tasks.push(Task {
                        file_index: index,
                        file: file.clone(),
                        linter: linter.name.clone(),
                        adapter: Arc::clone(&linter.adapter),
                        fix: linter.fix,
                        level: linter.level,
                        options: linter.options.clone(),
                    });
                    task_counts[index] += 1;
                }
            }
        }
        info!(
            "dispatching {} task(s) across {} file(s)",
            tasks.len(),
            files.len()
        );

        let shared_files = Arc::new(files.clone());
        let mut pending: Vec<Vec<Notice>> = files.iter().map(|_| Vec::new()).collect();
        let mut remaining = task_counts;
        let mut reorder = ReorderBuffer::new(files.len());
        let mut delivered: Vec<(PathBuf, FileReport)> = Vec::with_capacity(files.len());
        let reporters = &mut self.config.reporters;

        // Files with no work are deliverable immediately: either nothing
        // applied (the sentinel) or a scope applied with zero linters.
        for (index, _) in files.iter().enumerate() {
            if remaining[index] == 0 {
                let report = if applied[index] {
                    FileReport::Analyzed(Vec::new())
                } else {
                    FileReport::NotAnalyzed
                };
                for (slot, report) in reorder.push(index, report) {
                    deliver(reporters, &files[slot], &report).await?;
                    delivered.push((files[slot].clone(), report));
                }
            }
        }

        let root = self.root.clone();
        let mut results = stream::iter(tasks.into_iter().map(move |task| {
            let root = root.clone();
            let shared_files = Arc::clone(&shared_files);
            async move {
                let index = task.file_index;
                let file = task.file.clone();
                let linter = task.linter.clone();
                let handle = tokio::spawn(run_task(task, root, shared_files));
                match handle.await {
                    Ok(notices) => (index, notices),
                    // A panicking adapter is handled like a throwing one.
                    Err(join_error) => (
                        index,
                        vec![Notice::new(
                            file,
                            linter,
                            Severity::Fatal,
                            format!("linter task aborted: {join_error}"),
                        )],
                    ),
                }
            }
        }))
        .buffer_unordered(self.concurrency);

        while let Some((index, notices)) = results.next().await {
            pending[index].extend(notices);
            remaining[index] -= 1;
            if remaining[index] > 0 {
                continue;
            }

            let mut notices = std::mem::take(&mut pending[index]);
            notices.sort_by(|a, b| a.location_ordering(b));
            for (slot, report) in reorder.push(index, FileReport::Analyzed(notices)) {
                deliver(reporters, &files[slot], &report).await?;
                delivered.push((files[slot].clone(), report));
            }
        }
        drop(results);
        debug_assert!(reorder.is_drained());

        let overall = overall_severity(
            delivered
                .iter()
                .filter_map(|(_, report)| report.notices())
                .flatten(),
        );
        for reporter in reporters.iter_mut() {
            reporter.formatter.finalize(overall).await?;
        }

        info!(
            "run complete: {} file(s), overall severity {}",
            delivered.len(),
            overall.map(|s| s.name()).unwrap_or("none"),
        );

        Ok(RunOutcome {
            files: delivered,
            overall,
        })
    }
}

/// Execute one task: skip when nothing could pass the ceiling, invoke the
/// adapter otherwise, filter by level, and recover failures into a synthetic
/// FATAL notice so one broken tool cannot starve the run.
async fn run_task(task: Task, root: PathBuf, files: Arc<Vec<PathBuf>>) -> Vec<Notice> {
    if task.level < task.adapter.best_severity() {
        debug!(
            linter = %task.linter,
            file = %task.file.display(),
            "skipping invocation: level filters everything this adapter can produce",
        );
        return Vec::new();
    }

    let ctx = AdapterContext {
        level: task.level,
        fix: task.fix,
        root,
        files,
        options: task.options,
    };

    match task.adapter.lint(&task.file, &ctx).await {
        Ok(notices) => notices
            .into_iter()
            .filter(|notice| task.level.shows(notice.severity))
            .collect(),
        Err(error) => {
            warn!(
                linter = %task.linter,
                file = %task.file.display(),
                "adapter failed: {error}",
            );
            vec![Notice::new(
                task.file,
                task.linter,
                Severity::Fatal,
                format!("linter invocation failed: {error}"),
            )]
        }
    }
}

/// Hand one file's report to every reporter, applying per-reporter severity
/// ceilings.
async fn deliver(reporters: &mut [ReporterSpec], file: &Path, report: &FileReport) -> Result<()> {
    for reporter in reporters.iter_mut() {
        match (report, reporter.level) {
            (FileReport::Analyzed(notices), Some(level)) => {
                let filtered: Vec<Notice> = notices
                    .iter()
                    .filter(|notice| level.shows(notice.severity))
                    .cloned()
                    .collect();
                reporter
                    .formatter
                    .notify(file, &FileReport::Analyzed(filtered))
                    .await?;
            }
            _ => reporter.formatter.notify(file, report).await?,
        }
    }
    Ok(())
}
