//! Finding deduplication across reviewers.
//!
//! Independent reviewers report the same logical issue with slightly
//! different line anchors and wordings. The [`Deduplicator`] partitions the
//! combined finding set into equivalence classes via union-find over
//! pairwise duplicate edges, then collapses each class into one canonical
//! finding. The partition is transitive and independent of the order
//! reviewers are processed in, so completion order never affects the report.

use super::finding::Finding;
use super::similarity::message_similarity;
use crate::core::error::DomainError;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Thresholds controlling when two findings count as duplicates.
///
/// The defaults are heuristics, deliberately configurable rather than
/// contractual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    /// Two line anchors within this distance refer to the same issue.
    pub line_tolerance: u32,
    /// Minimum Jaccard message similarity for a duplicate pair.
    pub similarity_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 3,
            similarity_threshold: 0.6,
        }
    }
}

impl DedupConfig {
    pub fn new(line_tolerance: u32, similarity_threshold: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&similarity_threshold) {
            return Err(DomainError::InvalidThreshold(similarity_threshold));
        }
        Ok(Self {
            line_tolerance,
            similarity_threshold,
        })
    }
}

/// Merges near-duplicate findings from the council into one canonical set.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    config: DedupConfig,
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Merge all findings from successful reviewers into one deduplicated,
    /// deterministically-ordered sequence.
    ///
    /// Each finding is stamped with its reviewer as a source before
    /// grouping, so corroboration survives the merge. The result is sorted
    /// by descending severity, then path, then line, then message.
    pub fn merge(&self, per_reviewer: &BTreeMap<String, Vec<Finding>>) -> Vec<Finding> {
        let mut findings: Vec<Finding> = Vec::new();
        for (reviewer, batch) in per_reviewer {
            for finding in batch {
                let mut stamped = finding.clone();
                stamped.sources.insert(reviewer.clone());
                findings.push(stamped);
            }
        }
        if findings.is_empty() {
            return findings;
        }

        // Total order before grouping, so the partition and every canonical
        // choice below are independent of the caller's iteration order.
        findings.sort_by(Self::canonical_order);

        let mut groups = UnionFind::new(findings.len());
        for i in 0..findings.len() {
            for j in (i + 1)..findings.len() {
                if self.are_duplicates(&findings[i], &findings[j]) {
                    groups.union(i, j);
                }
            }
        }

        let mut classes: BTreeMap<usize, Vec<&Finding>> = BTreeMap::new();
        for (index, finding) in findings.iter().enumerate() {
            classes.entry(groups.find(index)).or_default().push(finding);
        }

        let mut merged: Vec<Finding> = classes.into_values().map(Self::merge_class).collect();
        merged.sort_by(Self::canonical_order);
        merged
    }

    /// Duplicate test: same normalized file, compatible line anchors, and
    /// similar-enough messages.
    fn are_duplicates(&self, a: &Finding, b: &Finding) -> bool {
        if a.location.normalized_path() != b.location.normalized_path() {
            return false;
        }
        if !a
            .location
            .lines_within(&b.location, self.config.line_tolerance)
        {
            return false;
        }
        message_similarity(&a.message, &b.message) >= self.config.similarity_threshold
    }

    /// Collapse one equivalence class into its canonical finding: severity
    /// escalates to the class maximum, sources union, distinct fixes are
    /// concatenated, and message/location come from the first member in
    /// canonical order (the highest-severity one).
    fn merge_class(members: Vec<&Finding>) -> Finding {
        let mut canonical = members[0].clone();

        let mut fixes: Vec<&str> = Vec::new();
        for member in &members {
            canonical.severity = canonical.severity.max(member.severity);
            canonical.sources.extend(member.sources.iter().cloned());
            if let Some(fix) = member.suggested_fix.as_deref()
                && !fixes.contains(&fix)
            {
                fixes.push(fix);
            }
        }
        canonical.suggested_fix = if fixes.is_empty() {
            None
        } else {
            Some(fixes.join("; "))
        };

        canonical
    }

    /// Presentation and tie-break order: descending severity, then path,
    /// then line, then message, then sources.
    fn canonical_order(a: &Finding, b: &Finding) -> Ordering {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.location.normalized_path().cmp(&b.location.normalized_path()))
            .then_with(|| {
                a.location
                    .line
                    .unwrap_or(0)
                    .cmp(&b.location.line.unwrap_or(0))
            })
            .then_with(|| a.message.cmp(&b.message))
            .then_with(|| a.sources.cmp(&b.sources))
    }
}

/// Union-find with path halving; small and allocation-free after `new`.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            // Attach the larger root under the smaller for determinism.
            let (low, high) = if root_a < root_b {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };
            self.parent[high] = low;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::finding::{Category, Location, Severity};

    fn finding(severity: Severity, path: &str, line: Option<u32>, message: &str) -> Finding {
        Finding::new(
            severity,
            Category::Security,
            Location::new(path, line),
            message,
        )
    }

    fn by_reviewer(batches: Vec<(&str, Vec<Finding>)>) -> BTreeMap<String, Vec<Finding>> {
        batches
            .into_iter()
            .map(|(reviewer, findings)| (reviewer.to_string(), findings))
            .collect()
    }

    #[test]
    fn test_paraphrased_findings_merge_with_provenance() {
        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![
            (
                "openai/gpt-5.2-codex",
                vec![finding(
                    Severity::High,
                    ".claude/settings.json",
                    Some(12),
                    "unvalidated user input reaches the shell",
                )],
            ),
            (
                "gemini/gemini-3-pro-preview",
                vec![finding(
                    Severity::Critical,
                    ".claude/settings.json",
                    Some(13),
                    "user input passed to shell without validation",
                )],
            ),
        ]));

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].severity, Severity::Critical);
        assert_eq!(merged[0].sources.len(), 2);
        assert!(merged[0].is_corroborated());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = finding(
            Severity::High,
            "CLAUDE.md",
            Some(4),
            "secrets committed to the repository",
        );
        let b = finding(
            Severity::Medium,
            "CLAUDE.md",
            Some(5),
            "secrets committed in the repository",
        );
        let c = finding(
            Severity::Low,
            "models.json",
            None,
            "model list missing fallback entry",
        );

        let dedup = Deduplicator::default();
        let forward = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![a.clone(), c.clone()]),
            ("beta", vec![b.clone()]),
        ]));
        let reversed = dedup.merge(&by_reviewer(vec![
            ("beta", vec![b]),
            ("alpha", vec![c, a]),
        ]));

        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_merge_is_transitive() {
        // a ~ b and b ~ c via overlapping line windows; a and c are five
        // lines apart, beyond tolerance, but must still land in one class.
        let a = finding(Severity::Medium, "CLAUDE.md", Some(10), "hook deletes files outside sandbox");
        let b = finding(Severity::Medium, "CLAUDE.md", Some(13), "hook deletes files outside sandbox");
        let c = finding(Severity::High, "CLAUDE.md", Some(15), "hook deletes files outside sandbox");

        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![a]),
            ("beta", vec![b]),
            ("gamma", vec![c]),
        ]));

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].severity, Severity::High);
        assert_eq!(merged[0].sources.len(), 3);
    }

    #[test]
    fn test_different_files_never_merge() {
        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![
            (
                "alpha",
                vec![finding(Severity::Low, "CLAUDE.md", Some(1), "missing overview")],
            ),
            (
                "beta",
                vec![finding(Severity::Low, "README.md", Some(1), "missing overview")],
            ),
        ]));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_line_tolerance_boundary() {
        let dedup = Deduplicator::default();
        let inside = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![finding(Severity::Low, "a.md", Some(10), "broken link target")]),
            ("beta", vec![finding(Severity::Low, "a.md", Some(13), "broken link target")]),
        ]));
        assert_eq!(inside.len(), 1);

        let outside = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![finding(Severity::Low, "a.md", Some(10), "broken link target")]),
            ("beta", vec![finding(Severity::Low, "a.md", Some(14), "broken link target")]),
        ]));
        assert_eq!(outside.len(), 2);
    }

    #[test]
    fn test_distinct_fixes_concatenate() {
        let first = finding(Severity::Medium, "a.md", Some(1), "permissions too broad")
            .with_fix("narrow the allowlist");
        let second = finding(Severity::Medium, "a.md", Some(2), "permissions too broad")
            .with_fix("add explicit deny rules");
        let third = finding(Severity::Medium, "a.md", Some(3), "permissions too broad")
            .with_fix("narrow the allowlist");

        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![first]),
            ("beta", vec![second]),
            ("gamma", vec![third]),
        ]));

        assert_eq!(merged.len(), 1);
        let fix = merged[0].suggested_fix.as_deref().unwrap();
        assert!(fix.contains("narrow the allowlist"));
        assert!(fix.contains("add explicit deny rules"));
        assert_eq!(fix.matches("narrow the allowlist").count(), 1);
    }

    #[test]
    fn test_same_reviewer_duplicates_collapse() {
        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![(
            "alpha",
            vec![
                finding(Severity::Low, "a.md", Some(5), "trailing whitespace in config"),
                finding(Severity::Low, "a.md", Some(6), "trailing whitespace in config"),
            ],
        )]));

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sources.len(), 1);
    }

    #[test]
    fn test_output_sorted_by_severity_then_location() {
        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![(
            "alpha",
            vec![
                finding(Severity::Low, "a.md", Some(1), "minor style inconsistency"),
                finding(Severity::Critical, "z.md", Some(9), "credentials stored in plaintext"),
                finding(Severity::High, "b.md", Some(2), "deny rules absent for rm"),
                finding(Severity::High, "a.md", Some(7), "shell hook runs untrusted code"),
            ],
        )]));

        let order: Vec<(Severity, String)> = merged
            .iter()
            .map(|f| (f.severity, f.location.normalized_path()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, "z.md".to_string()),
                (Severity::High, "a.md".to_string()),
                (Severity::High, "b.md".to_string()),
                (Severity::Low, "a.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_line_only_matches_missing_line() {
        let dedup = Deduplicator::default();
        let merged = dedup.merge(&by_reviewer(vec![
            ("alpha", vec![finding(Severity::Medium, "a.md", None, "memory section absent")]),
            ("beta", vec![finding(Severity::Medium, "a.md", Some(3), "memory section absent")]),
        ]));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_config_rejects_bad_threshold() {
        assert!(DedupConfig::new(3, 1.2).is_err());
        assert!(DedupConfig::new(0, 0.0).is_ok());
    }

    #[test]
    fn test_empty_input() {
        let dedup = Deduplicator::default();
        assert!(dedup.merge(&BTreeMap::new()).is_empty());
    }
}
