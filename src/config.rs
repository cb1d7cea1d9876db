//! @ai:module:intent Configuration structs for the planner benchmark suite
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, PlannerConfig, RunConfig, PathConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the benchmark suite
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent External planner invocation contract
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Command prefix the planner is spawned with; domain/problem paths and
    /// selector flags are appended per run.
    #[serde(default = "default_planner_command")]
    pub command: Vec<String>,
    /// Stdout marker that signals a solved problem. Configurable because the
    /// marker text is the brittle part of the planner contract.
    #[serde(default = "default_goal_marker")]
    pub goal_marker: String,
}

/// @ai:intent Run configuration: what to benchmark and under which limits
///
/// Search/heuristic lists are explicit configuration handed to the corpus
/// walker, never process-wide defaults, so test runs can vary them freely.
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_searches")]
    pub searches: Vec<String>,
    #[serde(default = "default_heuristics")]
    pub heuristics: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_problems")]
    pub max_problems_per_domain: usize,
    #[serde(default)]
    pub allow_invalid_combinations: bool,
    /// Substring filters against domain directory names; None runs everything.
    #[serde(default)]
    pub domain_filter: Option<Vec<String>>,
}

/// @ai:intent Path configuration for input corpus and output artifacts
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub benchmark_dir: PathBuf,
    pub results_file: PathBuf,
    pub reports_dir: PathBuf,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            command: default_planner_command(),
            goal_marker: default_goal_marker(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            searches: default_searches(),
            heuristics: default_heuristics(),
            timeout_secs: default_timeout_secs(),
            max_problems_per_domain: default_max_problems(),
            allow_invalid_combinations: false,
            domain_filter: None,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            benchmark_dir: PathBuf::from("benchmarks"),
            results_file: PathBuf::from("benchmark_results.csv"),
            reports_dir: PathBuf::from("benchmark_analysis"),
        }
    }
}

fn default_planner_command() -> Vec<String> {
    vec![
        "python".to_string(),
        "-m".to_string(),
        "pyperplan".to_string(),
    ]
}

fn default_goal_marker() -> String {
    "Goal reached".to_string()
}

fn default_searches() -> Vec<String> {
    vec!["astar".to_string(), "gbf".to_string()]
}

fn default_heuristics() -> Vec<String> {
    vec![
        "hmax".to_string(),
        "hadd".to_string(),
        "hff".to_string(),
        "blind".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_max_problems() -> usize {
    10
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl RunConfig {
    /// @ai:intent Check whether a (search, heuristic) pair is a valid planner configuration
    ///
    /// The blind heuristic is only meaningful under astar; other pairings are
    /// skipped unless invalid combinations are explicitly allowed.
    /// @ai:effects pure
    pub fn is_valid_combination(&self, search: &str, heuristic: &str) -> bool {
        heuristic != "blind" || search == "astar"
    }

    /// @ai:intent Check whether a domain directory name passes the filter
    /// @ai:effects pure
    pub fn matches_domain(&self, dir_name: &str) -> bool {
        match &self.domain_filter {
            None => true,
            Some(filters) => {
                let name = dir_name.to_lowercase();
                filters.iter().any(|f| name.contains(&f.to_lowercase()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_planner_conventions() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.run.searches, vec!["astar", "gbf"]);
        assert_eq!(config.run.timeout_secs, 5);
        assert_eq!(config.planner.command[0], "python");
        assert_eq!(config.planner.goal_marker, "Goal reached");
    }

    #[test]
    fn test_blind_restricted_to_astar() {
        let run = RunConfig::default();
        assert!(run.is_valid_combination("astar", "blind"));
        assert!(!run.is_valid_combination("gbf", "blind"));
        assert!(run.is_valid_combination("gbf", "hmax"));
    }

    #[test]
    fn test_domain_filter_substring_case_insensitive() {
        let run = RunConfig {
            domain_filter: Some(vec!["Blocks".to_string()]),
            ..Default::default()
        };
        assert!(run.matches_domain("blocksworld"));
        assert!(run.matches_domain("BLOCKS-3ops"));
        assert!(!run.matches_domain("gripper"));

        let unfiltered = RunConfig::default();
        assert!(unfiltered.matches_domain("anything"));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = BenchmarkConfig::default();
        let toml_text = toml::to_string_pretty(&config).unwrap();
        let parsed: BenchmarkConfig = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed.run.heuristics, config.run.heuristics);
        assert_eq!(parsed.paths.results_file, config.paths.results_file);
    }
}
