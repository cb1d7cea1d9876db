//! @ai:module:intent Content-based classification of PDDL files
//! @ai:module:layer domain
//! @ai:module:public_api FileClassifier
//! @ai:module:stateless true

use regex::Regex;
use std::io::Read;
use std::path::Path;

/// Bytes of file content inspected by the problem test. Enough to see the
/// define/goal structure without paying full-file I/O on large corpora.
const SNIFF_PREFIX_BYTES: usize = 2048;

/// @ai:intent Trait for PDDL content sniffing
///
/// Heuristic keyword matching stands in for a real parser; a strict parser
/// implementation can drop in behind this seam.
pub trait FileClassifierTrait: Send + Sync {
    /// @ai:intent Decide whether a file is a PDDL problem file
    fn is_problem_file(&self, path: &Path) -> bool;

    /// @ai:intent Decide whether a file is a PDDL domain file
    fn is_domain_file(&self, path: &Path) -> bool;

    /// @ai:intent Extract the domain name a problem file declares
    fn declared_domain_name(&self, path: &Path) -> Option<String>;
}

/// @ai:intent Classifies PDDL files by structural keyword signals
pub struct FileClassifier {
    domain_decl: Regex,
}

impl FileClassifier {
    /// @ai:intent Create a new classifier
    /// @ai:effects pure
    pub fn new() -> Self {
        Self {
            domain_decl: Regex::new(r"\(:domain\s+([^)]+)\)").unwrap(),
        }
    }

    /// @ai:intent Read a bounded prefix of a file, tolerating bad encodings
    ///
    /// Any failure yields None: classification is best-effort and must never
    /// abort corpus traversal.
    /// @ai:effects fs:read
    fn read_prefix(path: &Path, limit: usize) -> Option<String> {
        let mut file = std::fs::File::open(path).ok()?;
        let mut buf = Vec::with_capacity(limit);
        file.take(limit as u64).read_to_end(&mut buf).ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    /// @ai:intent Read a whole file, tolerating bad encodings
    /// @ai:effects fs:read
    fn read_all(path: &Path) -> Option<String> {
        let bytes = std::fs::read(path).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for FileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FileClassifierTrait for FileClassifier {
    /// @ai:intent Decide whether a file is a PDDL problem file
    ///
    /// Conjunctive structural test on a bounded prefix: goal section, a
    /// top-level define, and the problem token. False positives are an
    /// accepted tradeoff for skipping a full parse.
    /// @ai:effects fs:read
    fn is_problem_file(&self, path: &Path) -> bool {
        match Self::read_prefix(path, SNIFF_PREFIX_BYTES) {
            Some(content) => {
                content.contains("(:goal")
                    && content.contains("(define")
                    && content.contains("problem")
            }
            None => false,
        }
    }

    /// @ai:intent Decide whether a file is a PDDL domain file
    ///
    /// Symmetric to the problem test: action schemas present, goal section
    /// absent. Domain files can declare actions late, so the whole file is
    /// scanned here.
    /// @ai:effects fs:read
    fn is_domain_file(&self, path: &Path) -> bool {
        match Self::read_all(path) {
            Some(content) => content.contains(":action") && !content.contains("(:goal"),
            None => false,
        }
    }

    /// @ai:intent Extract the domain name a problem file declares
    ///
    /// Missing declaration or unreadable file is "no signal", never an error.
    /// @ai:effects fs:read
    fn declared_domain_name(&self, path: &Path) -> Option<String> {
        let content = Self::read_all(path)?;
        self.domain_decl
            .captures(&content)
            .map(|caps| caps[1].trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROBLEM: &str = "(define (problem pb1)\n  (:domain blocksworld)\n  (:objects a b)\n  (:init (on a b))\n  (:goal (on b a)))\n";
    const DOMAIN: &str = "(define (domain blocksworld)\n  (:predicates (on ?x ?y))\n  (:action stack\n    :parameters (?x ?y)\n    :effect (on ?x ?y)))\n";

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_classifies_problem_file() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "pb1.pddl", PROBLEM);

        let classifier = FileClassifier::new();
        assert!(classifier.is_problem_file(&path));
        assert!(!classifier.is_domain_file(&path));
    }

    #[test]
    fn test_classifies_domain_file() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "domain.pddl", DOMAIN);

        let classifier = FileClassifier::new();
        assert!(classifier.is_domain_file(&path));
        assert!(!classifier.is_problem_file(&path));
    }

    #[test]
    fn test_missing_file_is_no_signal() {
        let classifier = FileClassifier::new();
        let path = Path::new("/nonexistent/never.pddl");
        assert!(!classifier.is_problem_file(path));
        assert!(!classifier.is_domain_file(path));
        assert_eq!(classifier.declared_domain_name(path), None);
    }

    #[test]
    fn test_extracts_declared_domain_name() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "pb1.pddl", PROBLEM);

        let classifier = FileClassifier::new();
        assert_eq!(
            classifier.declared_domain_name(&path),
            Some("blocksworld".to_string())
        );
    }

    #[test]
    fn test_no_declaration_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "pb2.pddl", "(define (problem pb2) (:goal (done)))");

        let classifier = FileClassifier::new();
        assert_eq!(classifier.declared_domain_name(&path), None);
    }

    #[test]
    fn test_non_utf8_content_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("weird.pddl");
        let mut bytes = PROBLEM.as_bytes().to_vec();
        bytes.push(0xFF);
        std::fs::write(&path, bytes).unwrap();

        let classifier = FileClassifier::new();
        assert!(classifier.is_problem_file(&path));
    }
}
