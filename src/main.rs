//! @ai:module:intent CLI for the PDDL planner benchmark suite
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use pddl_bench::{
    config::{BenchmarkConfig, RunConfig},
    corpus::CorpusWalker,
    metrics::{BenchmarkRecord, BenchmarkSummary, MetricsAggregator, MetricsAggregatorTrait},
    report::{CsvSink, CsvSinkTrait, ReportGenerator},
    runner::{MockPlannerRunner, PlannerRunner, PlannerRunnerTrait},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pddl-bench")]
#[command(about = "Benchmark PDDL planners across search algorithms and heuristics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run benchmarks over a corpus directory
    Run {
        /// Directory containing benchmark domains
        benchmark_dir: PathBuf,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Search algorithms to benchmark (comma-separated)
        #[arg(long)]
        searches: Option<String>,

        /// Heuristics to benchmark (comma-separated)
        #[arg(long)]
        heuristics: Option<String>,

        /// Filter domain directories by substring (comma-separated)
        #[arg(long)]
        domains: Option<String>,

        /// Timeout in seconds for each planner run
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum number of problems to test per domain
        #[arg(long)]
        max_problems: Option<usize>,

        /// Also run combinations that are normally invalid (like blind with non-astar)
        #[arg(long)]
        allow_invalid: bool,

        /// Replay canned planner output instead of spawning the planner
        #[arg(long)]
        dry_run: bool,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate analysis reports from an existing results CSV
    Report {
        /// CSV file with benchmark results
        #[arg(short, long)]
        results: PathBuf,

        /// Directory for report artifacts
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List discovered problems and their resolved domain files
    List {
        /// Directory containing benchmark domains
        benchmark_dir: PathBuf,

        /// Filter domain directories by substring (comma-separated)
        #[arg(long)]
        domains: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Probe which heuristics the configured planner accepts
    Probe {
        /// Heuristic names to probe (comma-separated)
        #[arg(long)]
        heuristics: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "benchmark.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pddl_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            benchmark_dir,
            config,
            searches,
            heuristics,
            domains,
            timeout,
            max_problems,
            allow_invalid,
            dry_run,
            output,
        } => {
            run_benchmarks(RunArgs {
                benchmark_dir,
                config,
                searches,
                heuristics,
                domains,
                timeout,
                max_problems,
                allow_invalid,
                dry_run,
                output,
            })
            .await
        }
        Commands::Report {
            results,
            output_dir,
            config,
        } => generate_reports(results, output_dir, config),
        Commands::List {
            benchmark_dir,
            domains,
            config,
        } => list_problems(benchmark_dir, domains, config),
        Commands::Probe { heuristics, config } => probe_heuristics(heuristics, config).await,
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    benchmark_dir: PathBuf,
    config: Option<PathBuf>,
    searches: Option<String>,
    heuristics: Option<String>,
    domains: Option<String>,
    timeout: Option<u64>,
    max_problems: Option<usize>,
    allow_invalid: bool,
    dry_run: bool,
    output: Option<PathBuf>,
}

/// @ai:intent Run the benchmark batch and persist the result dataset
/// @ai:effects fs:read, fs:write, io
async fn run_benchmarks(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config.clone())?;

    apply_run_overrides(&mut config.run, &args);

    let output = args
        .output
        .unwrap_or_else(|| config.paths.results_file.clone());

    tracing::info!(
        "Benchmarking corpus at {} ({} searches x {} heuristics, timeout {}s)",
        args.benchmark_dir.display(),
        config.run.searches.len(),
        config.run.heuristics.len(),
        config.run.timeout_secs
    );

    let records = if args.dry_run {
        tracing::info!("Running in dry-run mode");
        let runner = Arc::new(MockPlannerRunner::new(
            "Goal reached\n0 Nodes expanded\nPlan length: 0\n".to_string(),
        ));
        execute(runner, config.run.clone(), &args.benchmark_dir).await?
    } else {
        let runner = Arc::new(PlannerRunner::new(config.planner.clone()));
        execute(runner, config.run.clone(), &args.benchmark_dir).await?
    };

    if records.is_empty() {
        tracing::warn!("No results collected.");
        return Ok(());
    }

    CsvSink::new().write(&records, &output)?;
    tracing::info!("Results saved to {}", output.display());

    let summary = MetricsAggregator::new().aggregate(&records);
    print_summary(&summary);

    Ok(())
}

/// @ai:intent Drive the corpus walker with the chosen runner
/// @ai:effects fs:read, io
async fn execute<R: PlannerRunnerTrait>(
    runner: Arc<R>,
    run_config: RunConfig,
    benchmark_dir: &Path,
) -> Result<Vec<BenchmarkRecord>> {
    let walker = CorpusWalker::new(runner, run_config);
    walker.walk(benchmark_dir).await
}

/// @ai:intent Generate analysis artifacts from a persisted dataset
/// @ai:effects fs:read, fs:write
fn generate_reports(
    results: PathBuf,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_or_default_config(config)?;
    let output_dir = output_dir.unwrap_or_else(|| config.paths.reports_dir.clone());

    let records = CsvSink::new().load(&results)?;

    if records.is_empty() {
        tracing::warn!("Dataset {} contains no records", results.display());
        return Ok(());
    }

    let summary = MetricsAggregator::new().aggregate(&records);
    ReportGenerator::new().generate_all(&summary, &output_dir)?;

    println!("Analysis complete. Results saved to {}", output_dir.display());
    println!(
        "Summary report: {}",
        output_dir.join("benchmark_report.md").display()
    );
    Ok(())
}

/// @ai:intent List discovered problems with their resolved domain files
/// @ai:effects fs:read
fn list_problems(
    benchmark_dir: PathBuf,
    domains: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_or_default_config(config)?;
    config.run.domain_filter = split_list(domains).or(config.run.domain_filter);

    // Discovery never invokes the planner; any runner satisfies the walker.
    let walker = CorpusWalker::new(
        Arc::new(MockPlannerRunner::new(String::new())),
        config.run.clone(),
    );
    let directories = walker.discover(&benchmark_dir)?;

    for directory in &directories {
        println!(
            "{} ({} problems)",
            directory.path.display(),
            directory.pairs.len()
        );

        for pair in &directory.pairs {
            let problem = pair
                .problem
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            match &pair.domain {
                Some(domain) => {
                    let domain = domain.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                    println!("  {:<30} -> {}", problem, domain);
                }
                None => println!("  {:<30} -> (unresolved)", problem),
            }
        }
    }

    let total: usize = directories.iter().map(|d| d.pairs.len()).sum();
    println!();
    println!(
        "{} problems across {} domain directories",
        total,
        directories.len()
    );
    Ok(())
}

/// @ai:intent Ask the planner which heuristic names it accepts
/// @ai:effects io
async fn probe_heuristics(heuristics: Option<String>, config: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config)?;
    let names = split_list(heuristics).unwrap_or_else(|| {
        [
            "blind", "goalcount", "hmax", "hadd", "hff", "hsa", "lmcut", "landmark",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    });

    let Some((program, prefix_args)) = config.planner.command.split_first() else {
        anyhow::bail!("planner command is empty");
    };

    println!("Checking available heuristics:");

    for name in &names {
        let output = tokio::process::Command::new(program)
            .args(prefix_args)
            .args(["--heuristic", name, "--help"])
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let available = !stderr.contains("error: argument --heuristic");
        println!("{} {}", if available { "ok " } else { "no " }, name);
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p),
        None => {
            let default_path = PathBuf::from("benchmark.toml");

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

/// @ai:intent Merge CLI overrides into the run configuration
/// @ai:effects pure
fn apply_run_overrides(run: &mut RunConfig, args: &RunArgs) {
    if let Some(searches) = split_list(args.searches.clone()) {
        run.searches = searches;
    }
    if let Some(heuristics) = split_list(args.heuristics.clone()) {
        run.heuristics = heuristics;
    }
    if let Some(domains) = split_list(args.domains.clone()) {
        run.domain_filter = Some(domains);
    }
    if let Some(timeout) = args.timeout {
        run.timeout_secs = timeout;
    }
    if let Some(max_problems) = args.max_problems {
        run.max_problems_per_domain = max_problems;
    }
    if args.allow_invalid {
        run.allow_invalid_combinations = true;
    }
}

/// @ai:intent Split a comma-separated CLI list
/// @ai:effects pure
fn split_list(value: Option<String>) -> Option<Vec<String>> {
    value.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    })
}

/// @ai:intent Print the per-configuration summary table
/// @ai:effects io
fn print_summary(summary: &BenchmarkSummary) {
    println!();
    println!("Summary:");
    println!(
        "{:<15} {:<10} {:<15} {:<15} {:<15}",
        "Search", "Heuristic", "Success Rate", "Avg Runtime", "Avg Plan Length"
    );
    println!("{}", "-".repeat(70));

    for stats in &summary.by_config {
        let runtime = stats
            .avg_runtime
            .map(|v| format!("{:.3}s", v))
            .unwrap_or_else(|| "N/A".to_string());
        let plan_length = stats
            .avg_plan_length
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "N/A".to_string());

        println!(
            "{:<15} {:<10} {:<14.1}% {:<15} {:<15}",
            stats.search, stats.heuristic, stats.success_rate, runtime, plan_length
        );
    }

    println!();
    println!(
        "{} runs over {} problems in {} domains",
        summary.total_runs, summary.problems, summary.domains
    );
}
