//! @ai:module:intent Traverse a benchmark corpus and drive planner runs
//! @ai:module:layer application
//! @ai:module:public_api CorpusWalker, DomainDirectory, ResolvedPair
//! @ai:module:stateless false

use crate::config::RunConfig;
use crate::corpus::classifier::{FileClassifier, FileClassifierTrait};
use crate::corpus::resolver::{DomainResolver, DomainResolverTrait};
use crate::metrics::BenchmarkRecord;
use crate::runner::PlannerRunnerTrait;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// @ai:intent A problem file and its resolved domain file, if any
///
/// An absent domain is a legitimate terminal outcome: the walker skips and
/// logs instead of failing the batch.
#[derive(Debug, Clone)]
pub struct ResolvedPair {
    pub problem: PathBuf,
    pub domain: Option<PathBuf>,
}

/// @ai:intent One domain directory with its ordered, truncated problem set
#[derive(Debug, Clone)]
pub struct DomainDirectory {
    pub path: PathBuf,
    pub pairs: Vec<ResolvedPair>,
}

/// @ai:intent Walks the corpus and runs the full search/heuristic cross-product
///
/// Execution is sequential: one planner process in flight at a time, so
/// comparative runtime measurements are not invalidated by CPU contention.
pub struct CorpusWalker<R: PlannerRunnerTrait> {
    runner: Arc<R>,
    classifier: FileClassifier,
    resolver: DomainResolver,
    run_config: RunConfig,
    numeric_token: Regex,
}

impl<R: PlannerRunnerTrait> CorpusWalker<R> {
    /// @ai:intent Create a walker over the given runner and run configuration
    /// @ai:effects pure
    pub fn new(runner: Arc<R>, run_config: RunConfig) -> Self {
        Self {
            runner,
            classifier: FileClassifier::new(),
            resolver: DomainResolver::new(),
            run_config,
            numeric_token: Regex::new(r"\d+").unwrap(),
        }
    }

    /// @ai:intent Enumerate domain directories under the benchmark root
    ///
    /// A root containing `.pddl` files directly is itself a single domain
    /// directory; otherwise its immediate non-hidden subdirectories are the
    /// domains, optionally narrowed by the domain filter.
    /// @ai:effects fs:read
    fn domain_directories(&self, root: &Path) -> Result<Vec<PathBuf>> {
        anyhow::ensure!(root.is_dir(), "{} is not a directory", root.display());

        let has_direct_pddl = std::fs::read_dir(root)
            .with_context(|| format!("failed to list {}", root.display()))?
            .filter_map(|e| e.ok())
            .any(|e| {
                e.path().is_file()
                    && e.path()
                        .extension()
                        .map(|ext| ext == "pddl")
                        .unwrap_or(false)
            });

        if has_direct_pddl {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
            .with_context(|| format!("failed to list {}", root.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_dir()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| !n.starts_with('.') && self.run_config.matches_domain(n))
                        .unwrap_or(false)
            })
            .collect();

        dirs.sort();
        Ok(dirs)
    }

    /// @ai:intent Sort key for problem files: first numeric token, lexical fallback
    ///
    /// Gives the human-meaningful order pb1, pb2, pb10 instead of the lexical
    /// pb1, pb10, pb2. Digitless names sort after numbered ones, lexically.
    /// @ai:effects pure
    fn problem_sort_key(&self, path: &Path) -> (u8, u64, String) {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        match self
            .numeric_token
            .find(&name)
            .and_then(|m| m.as_str().parse::<u64>().ok())
        {
            Some(number) => (0, number, name),
            None => (1, 0, name),
        }
    }

    /// @ai:intent Find, order and truncate the problem files of one domain directory
    ///
    /// An unlistable directory yields no problems; one bad directory never
    /// aborts the rest of the batch.
    /// @ai:effects fs:read
    fn problem_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("failed to list {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut problems: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension().map(|ext| ext == "pddl").unwrap_or(false)
                    && self.classifier.is_problem_file(p)
            })
            .collect();

        problems.sort_by_key(|p| self.problem_sort_key(p));
        problems.truncate(self.run_config.max_problems_per_domain);
        problems
    }

    /// @ai:intent Discover domain directories and resolve their problem files
    ///
    /// Pure discovery, no planner runs; also backs the `list` command.
    /// @ai:effects fs:read
    pub fn discover(&self, root: &Path) -> Result<Vec<DomainDirectory>> {
        let mut directories = Vec::new();

        for dir in self.domain_directories(root)? {
            let pairs = self
                .problem_files(&dir)
                .into_iter()
                .map(|problem| {
                    let domain = self.resolver.resolve(&problem);
                    ResolvedPair { problem, domain }
                })
                .collect();

            directories.push(DomainDirectory { path: dir, pairs });
        }

        Ok(directories)
    }

    /// @ai:intent Run the full cross-product over the corpus
    ///
    /// Record order is fully deterministic: domain directory, then problem
    /// (numeric-then-lexical), then search, then heuristic, as configured.
    /// @ai:effects fs:read, io
    pub async fn walk(&self, root: &Path) -> Result<Vec<BenchmarkRecord>> {
        let timeout = Duration::from_secs(self.run_config.timeout_secs);
        let mut records = Vec::new();

        for directory in self.discover(root)? {
            let dir_name = directory
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            tracing::info!("Processing domain directory: {}", dir_name);

            if directory.pairs.is_empty() {
                tracing::info!("No problem files found in {}", directory.path.display());
                continue;
            }

            for pair in &directory.pairs {
                let Some(domain) = &pair.domain else {
                    // One unresolved problem never aborts the batch.
                    tracing::warn!(
                        "Could not find domain file for {} (declared domain: {})",
                        pair.problem.display(),
                        self.classifier
                            .declared_domain_name(&pair.problem)
                            .unwrap_or_else(|| "<none>".to_string())
                    );
                    continue;
                };

                tracing::info!(
                    "Benchmarking problem {} against {}",
                    pair.problem.display(),
                    domain.display()
                );

                for search in &self.run_config.searches {
                    for heuristic in &self.run_config.heuristics {
                        if !self.run_config.allow_invalid_combinations
                            && !self.run_config.is_valid_combination(search, heuristic)
                        {
                            tracing::debug!(
                                "Skipping invalid combination {} + {}",
                                search,
                                heuristic
                            );
                            continue;
                        }

                        let record = self
                            .runner
                            .run(
                                domain,
                                &pair.problem,
                                Some(search),
                                Some(heuristic),
                                timeout,
                            )
                            .await;

                        tracing::info!(
                            "{} {} + {}: runtime {:.3}s, expanded {}, plan length {}",
                            if record.success { "ok" } else { "failed" },
                            search,
                            heuristic,
                            record.runtime,
                            record.expanded_nodes,
                            record.plan_length
                        );

                        records.push(record);
                    }
                }
            }
        }

        Ok(records)
    }
}
