//! @ai:module:intent Pair PDDL problem files with their domain files
//! @ai:module:layer domain
//! @ai:module:public_api DomainResolver
//! @ai:module:stateless true

use crate::corpus::classifier::{FileClassifier, FileClassifierTrait};
use std::path::{Path, PathBuf};

/// Historically drifted domain spellings. Expansion is symmetric: a problem
/// declaring either name resolves against a file carrying the other.
const SYNONYM_PAIRS: &[(&str, &str)] = &[("blocksworld", "blockworld")];

/// @ai:intent Trait for resolving a problem file to its domain file
pub trait DomainResolverTrait: Send + Sync {
    /// @ai:intent Find the domain file for a problem; None is a legitimate skip outcome
    fn resolve(&self, problem: &Path) -> Option<PathBuf>;
}

/// @ai:intent Resolves domain files through layered naming fallbacks
///
/// The corpus follows no single naming convention, so each layer trades
/// precision for recall. Layers run in fixed order: an exact declared-name
/// match always beats a guess.
pub struct DomainResolver {
    classifier: FileClassifier,
}

impl DomainResolver {
    /// @ai:intent Create a new resolver
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            classifier: FileClassifier::new(),
        }
    }

    /// @ai:intent Expand a declared domain name with its known synonyms
    /// @ai:effects pure
    fn expand_synonyms(declared: &str) -> Vec<String> {
        let mut candidates = vec![declared.to_string()];

        for (a, b) in SYNONYM_PAIRS {
            if declared == *a {
                candidates.push((*b).to_string());
            } else if declared == *b {
                candidates.push((*a).to_string());
            }
        }

        candidates
    }

    /// @ai:intent Look up candidate names as `<name>.pddl` in a directory
    /// @ai:effects fs:read
    fn lookup_candidates(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
        for candidate in candidates {
            let path = dir.join(format!("{}.pddl", candidate));
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }

    /// @ai:intent Sorted `.pddl` entries of a directory, excluding the problem file
    ///
    /// Sorting makes glob-style matches deterministic regardless of the
    /// filesystem's listing order.
    /// @ai:effects fs:read
    fn pddl_entries(dir: &Path, exclude: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(read) => read
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension().map(|ext| ext == "pddl").unwrap_or(false)
                        && p != exclude
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        entries.sort();
        entries
    }

    /// @ai:intent Try the fixed conventional domain filenames in a directory
    ///
    /// Order: literal `domain.pddl`, `*domain*.pddl` (which subsumes the
    /// `*.domain.pddl` suffix form), then the directory's own basename with
    /// a `.pddl` suffix.
    /// @ai:effects fs:read
    fn conventional_lookup(dir: &Path, problem: &Path) -> Option<PathBuf> {
        let literal = dir.join("domain.pddl");
        if literal.is_file() && literal != problem {
            return Some(literal);
        }

        let entries = Self::pddl_entries(dir, problem);

        if let Some(found) = entries.iter().find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.contains("domain"))
                .unwrap_or(false)
        }) {
            return Some(found.clone());
        }

        if let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) {
            let named_after_dir = dir.join(format!("{}.pddl", dir_name));
            if named_after_dir.is_file() && named_after_dir != problem {
                return Some(named_after_dir);
            }
        }

        None
    }

    /// @ai:intent Scan sibling `.pddl` files for one that looks like a domain
    /// @ai:effects fs:read
    fn structural_scan(&self, dir: &Path, problem: &Path) -> Option<PathBuf> {
        Self::pddl_entries(dir, problem)
            .into_iter()
            .find(|p| self.classifier.is_domain_file(p))
    }
}

impl Default for DomainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainResolverTrait for DomainResolver {
    /// @ai:intent Find the domain file for a problem; None is a legitimate skip outcome
    /// @ai:effects fs:read
    fn resolve(&self, problem: &Path) -> Option<PathBuf> {
        let dir = problem.parent()?;
        let declared = self.classifier.declared_domain_name(problem);
        let candidates = declared
            .as_deref()
            .map(Self::expand_synonyms)
            .unwrap_or_default();

        if let Some(found) = Self::lookup_candidates(dir, &candidates) {
            return Some(found);
        }

        if let Some(found) = Self::conventional_lookup(dir, problem) {
            return Some(found);
        }

        if let Some(found) = self.structural_scan(dir, problem) {
            return Some(found);
        }

        // Some corpora share one domain file across sibling problem
        // directories; retry the name-based layers one level up.
        if let Some(parent) = dir.parent() {
            if let Some(found) = Self::lookup_candidates(parent, &candidates) {
                return Some(found);
            }

            if let Some(found) = Self::conventional_lookup(parent, problem) {
                return Some(found);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOMAIN: &str = "(define (domain blocksworld)\n  (:action stack\n    :parameters (?x ?y)\n    :effect (on ?x ?y)))\n";

    fn problem_declaring(domain: &str) -> String {
        format!(
            "(define (problem pb1)\n  (:domain {})\n  (:goal (on a b)))\n",
            domain
        )
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_declared_name_wins_over_conventional() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("blocksworld"));
        let declared = write(temp.path(), "blocksworld.pddl", DOMAIN);
        write(temp.path(), "domain.pddl", DOMAIN);

        let resolved = DomainResolver::new().resolve(&problem);
        assert_eq!(resolved, Some(declared));
    }

    #[test]
    fn test_synonym_resolution_is_symmetric() {
        // Declares blocksworld, only blockworld.pddl exists.
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("blocksworld"));
        let variant = write(temp.path(), "blockworld.pddl", DOMAIN);
        assert_eq!(DomainResolver::new().resolve(&problem), Some(variant));

        // And the other direction.
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("blockworld"));
        let variant = write(temp.path(), "blocksworld.pddl", DOMAIN);
        assert_eq!(DomainResolver::new().resolve(&problem), Some(variant));
    }

    #[test]
    fn test_conventional_domain_file_fallback() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("gripper"));
        let conventional = write(temp.path(), "domain.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(conventional));
    }

    #[test]
    fn test_glob_domain_fallback() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("gripper"));
        let globbed = write(temp.path(), "gripper-domain.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(globbed));
    }

    #[test]
    fn test_suffixed_domain_file_fallback() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("logistics"));
        let suffixed = write(temp.path(), "logistics.domain.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(suffixed));
    }

    #[test]
    fn test_directory_basename_fallback() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("gripper");
        std::fs::create_dir(&dir).unwrap();
        let problem = write(&dir, "pb1.pddl", &problem_declaring("something-else"));
        let named = write(&dir, "gripper.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(named));
    }

    #[test]
    fn test_structural_scan_fallback() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("gripper"));
        // Unconventional name, but action schemas and no goal section.
        let oddly_named = write(temp.path(), "ops.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(oddly_named));
    }

    #[test]
    fn test_parent_directory_fallback() {
        let temp = TempDir::new().unwrap();
        let shared = write(temp.path(), "blocksworld.pddl", DOMAIN);
        let sub = temp.path().join("set1");
        std::fs::create_dir(&sub).unwrap();
        let problem = write(&sub, "pb1.pddl", &problem_declaring("blocksworld"));

        assert_eq!(DomainResolver::new().resolve(&problem), Some(shared));
    }

    #[test]
    fn test_unresolvable_returns_none() {
        let temp = TempDir::new().unwrap();
        let problem = write(temp.path(), "pb1.pddl", &problem_declaring("gripper"));

        assert_eq!(DomainResolver::new().resolve(&problem), None);
    }

    #[test]
    fn test_no_declaration_still_tries_conventions() {
        let temp = TempDir::new().unwrap();
        let problem = write(
            temp.path(),
            "pb1.pddl",
            "(define (problem pb1) (:goal (done)))",
        );
        let conventional = write(temp.path(), "domain.pddl", DOMAIN);

        assert_eq!(DomainResolver::new().resolve(&problem), Some(conventional));
    }
}
