//! @ai:module:intent Invoke the external planner and classify run outcomes
//! @ai:module:layer infrastructure
//! @ai:module:public_api PlannerRunner, MockPlannerRunner, OutputParser
//! @ai:module:stateless false

use crate::config::PlannerConfig;
use crate::metrics::{
    BenchmarkRecord, MetricValue, DEFAULT_HEURISTIC_LABEL, DEFAULT_SEARCH_LABEL,
};
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Grace period for draining the output pipes after the planner exits. A
/// grandchild process inheriting the pipes can hold them open indefinitely.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// @ai:intent Trait for executing one planner run
#[allow(async_fn_in_trait)]
pub trait PlannerRunnerTrait: Send + Sync {
    /// @ai:intent Run the planner once for a (domain, problem, search, heuristic) tuple
    ///
    /// Always returns a record in exactly one of three outcome classes:
    /// normal completion, timeout, or invocation error. Never fails the batch.
    async fn run(
        &self,
        domain: &Path,
        problem: &Path,
        search: Option<&str>,
        heuristic: Option<&str>,
        timeout: Duration,
    ) -> BenchmarkRecord;
}

/// @ai:intent Parses planner stdout into success flag and metrics
///
/// Success is determined purely from stdout content; the exit code is not
/// part of the planner contract.
pub struct OutputParser {
    goal_marker: String,
    nodes_expanded: Regex,
    plan_length: Regex,
}

impl OutputParser {
    /// @ai:intent Create a parser for the given goal marker
    /// @ai:effects pure
    pub fn new(goal_marker: &str) -> Self {
        Self {
            goal_marker: goal_marker.to_string(),
            nodes_expanded: Regex::new(r"(\d+) Nodes expanded").unwrap(),
            plan_length: Regex::new(r"Plan length: (\d+)").unwrap(),
        }
    }

    /// @ai:intent Extract (success, expanded nodes, plan length) from stdout
    ///
    /// A missing figure stays at zero rather than becoming an error: some
    /// outcomes (e.g. failed search) legitimately omit it.
    /// @ai:effects pure
    pub fn parse(&self, stdout: &str) -> (bool, MetricValue, MetricValue) {
        let success = stdout.contains(&self.goal_marker);

        let expanded = self
            .nodes_expanded
            .captures(stdout)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .unwrap_or(0);

        let length = self
            .plan_length
            .captures(stdout)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .unwrap_or(0);

        (
            success,
            MetricValue::Count(expanded),
            MetricValue::Count(length),
        )
    }
}

/// @ai:intent Identifiers and labels shared by all outcome records of one run
struct RunLabels {
    domain: String,
    problem: String,
    search: String,
    heuristic: String,
}

impl RunLabels {
    /// @ai:intent Derive record identifiers from file names and selectors
    /// @ai:effects pure
    fn new(domain: &Path, problem: &Path, search: Option<&str>, heuristic: Option<&str>) -> Self {
        Self {
            domain: file_id(domain),
            problem: file_id(problem),
            search: search.unwrap_or(DEFAULT_SEARCH_LABEL).to_string(),
            heuristic: heuristic.unwrap_or(DEFAULT_HEURISTIC_LABEL).to_string(),
        }
    }

    /// @ai:intent Build a failure record with the given sentinel in both metrics
    /// @ai:effects pure
    fn failure(&self, runtime: f64, sentinel: MetricValue) -> BenchmarkRecord {
        BenchmarkRecord {
            domain: self.domain.clone(),
            problem: self.problem.clone(),
            search: self.search.clone(),
            heuristic: self.heuristic.clone(),
            success: false,
            runtime,
            expanded_nodes: sentinel.clone(),
            plan_length: sentinel,
        }
    }
}

/// @ai:intent Record identifier derived from a file name, without the .pddl suffix
/// @ai:effects pure
fn file_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// @ai:intent Runs the external planner as a subprocess under a wall-clock timeout
pub struct PlannerRunner {
    config: PlannerConfig,
    parser: OutputParser,
}

impl PlannerRunner {
    /// @ai:intent Create a runner for the configured planner command
    /// @ai:effects pure
    pub fn new(config: PlannerConfig) -> Self {
        let parser = OutputParser::new(&config.goal_marker);
        Self { config, parser }
    }

    /// @ai:intent Build the planner command line for one run
    /// @ai:effects pure
    fn build_command(
        &self,
        domain: &Path,
        problem: &Path,
        search: Option<&str>,
        heuristic: Option<&str>,
    ) -> Option<Command> {
        let (program, prefix_args) = self.config.command.split_first()?;

        let mut cmd = Command::new(program);
        cmd.args(prefix_args);

        if let Some(search) = search {
            cmd.args(["--search", search]);
        }
        if let Some(heuristic) = heuristic {
            cmd.args(["--heuristic", heuristic]);
        }

        cmd.arg(domain).arg(problem);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Some(cmd)
    }
}

impl PlannerRunnerTrait for PlannerRunner {
    /// @ai:intent Run the planner once for a (domain, problem, search, heuristic) tuple
    /// @ai:effects io
    async fn run(
        &self,
        domain: &Path,
        problem: &Path,
        search: Option<&str>,
        heuristic: Option<&str>,
        timeout: Duration,
    ) -> BenchmarkRecord {
        let labels = RunLabels::new(domain, problem, search, heuristic);
        let start = Instant::now();

        let Some(mut cmd) = self.build_command(domain, problem, search, heuristic) else {
            return labels.failure(
                0.0,
                MetricValue::Error("planner command is empty".to_string()),
            );
        };

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return labels.failure(
                    start.elapsed().as_secs_f64(),
                    MetricValue::Error(format!("failed to spawn planner: {}", e)),
                );
            }
        };

        // Pipes are drained concurrently with the wait, so a chatty planner
        // cannot deadlock on a full pipe buffer.
        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let mut drain = tokio::spawn(async move {
            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            if let Some(pipe) = stdout_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut stdout).await;
            }
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut stderr).await;
            }
            (stdout, stderr)
        });

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(_status)) => {
                let elapsed = start.elapsed().as_secs_f64();
                let (stdout, stderr) =
                    match tokio::time::timeout(PIPE_DRAIN_GRACE, &mut drain).await {
                        Ok(joined) => joined.unwrap_or_default(),
                        Err(_expired) => {
                            tracing::warn!(
                                "output pipes for {}/{} still open after planner exit; discarding output",
                                labels.domain,
                                labels.problem
                            );
                            drain.abort();
                            (Vec::new(), Vec::new())
                        }
                    };
                let stdout = String::from_utf8_lossy(&stdout);
                let stderr = String::from_utf8_lossy(&stderr);

                if !stderr.is_empty() {
                    tracing::debug!(
                        "planner stderr for {}/{}: {}",
                        labels.domain,
                        labels.problem,
                        stderr.trim()
                    );
                }

                let (success, expanded_nodes, plan_length) = self.parser.parse(&stdout);

                BenchmarkRecord {
                    domain: labels.domain,
                    problem: labels.problem,
                    search: labels.search,
                    heuristic: labels.heuristic,
                    success,
                    runtime: elapsed,
                    expanded_nodes,
                    plan_length,
                }
            }
            Ok(Err(e)) => {
                drain.abort();
                labels.failure(
                    start.elapsed().as_secs_f64(),
                    MetricValue::Error(format!("failed to wait for planner: {}", e)),
                )
            }
            Err(_expired) => {
                // Terminate and reap; an abandoned child would leak across a
                // long batch.
                if let Err(e) = child.kill().await {
                    tracing::warn!("failed to kill timed-out planner: {}", e);
                }
                drain.abort();
                labels.failure(start.elapsed().as_secs_f64(), MetricValue::Timeout)
            }
        }
    }
}

/// @ai:intent Mock runner that replays canned planner output
///
/// Used for dry runs and for corpus walker tests; goes through the same
/// output parser as the real runner.
pub struct MockPlannerRunner {
    stdout: String,
    parser: OutputParser,
}

impl MockPlannerRunner {
    /// @ai:intent Create a mock replaying the given stdout text
    /// @ai:effects pure
    pub fn new(stdout: String) -> Self {
        Self {
            stdout,
            parser: OutputParser::new("Goal reached"),
        }
    }
}

impl PlannerRunnerTrait for MockPlannerRunner {
    /// @ai:intent Classify the canned output without spawning anything
    /// @ai:effects pure
    async fn run(
        &self,
        domain: &Path,
        problem: &Path,
        search: Option<&str>,
        heuristic: Option<&str>,
        _timeout: Duration,
    ) -> BenchmarkRecord {
        let labels = RunLabels::new(domain, problem, search, heuristic);
        let (success, expanded_nodes, plan_length) = self.parser.parse(&self.stdout);

        BenchmarkRecord {
            domain: labels.domain,
            problem: labels.problem,
            search: labels.search,
            heuristic: labels.heuristic,
            success,
            runtime: 0.0,
            expanded_nodes,
            plan_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runner_with_command(command: Vec<&str>) -> PlannerRunner {
        PlannerRunner::new(PlannerConfig {
            command: command.into_iter().map(String::from).collect(),
            goal_marker: "Goal reached".to_string(),
        })
    }

    #[test]
    fn test_parse_successful_output() {
        let parser = OutputParser::new("Goal reached");
        let stdout = "Parsing...\nGoal reached. Start extraction of solution.\n42 Nodes expanded\nPlan length: 7\n";

        let (success, nodes, length) = parser.parse(stdout);
        assert!(success);
        assert_eq!(nodes, MetricValue::Count(42));
        assert_eq!(length, MetricValue::Count(7));
    }

    #[test]
    fn test_parse_failed_search_defaults_to_zero() {
        let parser = OutputParser::new("Goal reached");
        let (success, nodes, length) = parser.parse("No solution could be found\n");

        assert!(!success);
        assert_eq!(nodes, MetricValue::Count(0));
        assert_eq!(length, MetricValue::Count(0));
    }

    #[tokio::test]
    async fn test_normal_completion_extracts_metrics() {
        let runner = runner_with_command(vec![
            "sh",
            "-c",
            "echo 'Goal reached'; echo '42 Nodes expanded'; echo 'Plan length: 7'",
        ]);

        let record = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_secs(5),
            )
            .await;

        assert!(record.success);
        assert_eq!(record.expanded_nodes, MetricValue::Count(42));
        assert_eq!(record.plan_length, MetricValue::Count(7));
        assert_eq!(record.domain, "domain");
        assert_eq!(record.problem, "pb1");
        assert_eq!(record.search, "astar");
        assert_eq!(record.heuristic, "hmax");
        assert!(record.runtime >= 0.0);
    }

    #[tokio::test]
    async fn test_repeated_runs_report_identical_outcomes() {
        let runner = runner_with_command(vec![
            "sh",
            "-c",
            "echo 'Goal reached'; echo '42 Nodes expanded'; echo 'Plan length: 7'",
        ]);

        let first = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_secs(5),
            )
            .await;
        let second = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(first.success, second.success);
        assert_eq!(first.expanded_nodes, second.expanded_nodes);
        assert_eq!(first.plan_length, second.plan_length);
    }

    #[tokio::test]
    async fn test_lingering_grandchild_does_not_stall_completion() {
        // sh exits immediately; the backgrounded sleep inherits the stdout
        // pipe and holds it open well past the drain grace.
        let runner = runner_with_command(vec!["sh", "-c", "sleep 30 & echo 'Goal reached'"]);

        let record = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_secs(20),
            )
            .await;

        // Runtime reflects planner exit, not the grandchild's lifetime.
        assert!(record.runtime < 5.0);
    }

    #[tokio::test]
    async fn test_timeout_yields_timeout_sentinels() {
        let runner = runner_with_command(vec!["sleep", "30"]);

        let record = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_millis(100),
            )
            .await;

        assert!(!record.success);
        assert_eq!(record.expanded_nodes, MetricValue::Timeout);
        assert_eq!(record.plan_length, MetricValue::Timeout);
        assert!(record.runtime >= 0.1);
        assert!(record.runtime < 5.0);
    }

    #[tokio::test]
    async fn test_missing_executable_yields_error_sentinels() {
        let runner = runner_with_command(vec!["definitely-not-a-planner-binary"]);

        let record = runner
            .run(
                Path::new("domain.pddl"),
                Path::new("pb1.pddl"),
                None,
                None,
                Duration::from_secs(1),
            )
            .await;

        assert!(!record.success);
        assert!(matches!(record.expanded_nodes, MetricValue::Error(_)));
        assert!(matches!(record.plan_length, MetricValue::Error(_)));
        // Absent selectors fall back to the canonical labels.
        assert_eq!(record.search, "breadth_first_search");
        assert_eq!(record.heuristic, "None");
    }

    #[tokio::test]
    async fn test_empty_command_is_invocation_error() {
        let runner = runner_with_command(vec![]);

        let record = runner
            .run(
                Path::new("d.pddl"),
                Path::new("p.pddl"),
                Some("astar"),
                Some("hmax"),
                Duration::from_secs(1),
            )
            .await;

        assert!(matches!(record.expanded_nodes, MetricValue::Error(_)));
    }

    #[tokio::test]
    async fn test_mock_runner_parses_canned_output() {
        let mock = MockPlannerRunner::new(
            "Goal reached\n12 Nodes expanded\nPlan length: 3\n".to_string(),
        );

        let record = mock
            .run(
                Path::new("d.pddl"),
                Path::new("p.pddl"),
                Some("gbf"),
                Some("hff"),
                Duration::from_secs(1),
            )
            .await;

        assert!(record.success);
        assert_eq!(record.expanded_nodes, MetricValue::Count(12));
        assert_eq!(record.plan_length, MetricValue::Count(3));
    }
}
