pub mod correlate;

use serde_json::Value;

use crate::error::MergeError;
use crate::report::stats::generate_stats;
use crate::report::types::{ArtifactRecord, MergedReport, Report, Suite, SuiteEntry};
use crate::source;

pub use correlate::{attach_artifacts, KeyExtractor};

/// Caller options for a merge run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Glob patterns selecting the report files to merge.
    pub files: Vec<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            files: vec!["./mochawesome-report/mochawesome*.json".to_string()],
        }
    }
}

impl MergeOptions {
    /// Fall back to the built-in pattern when the caller supplied none.
    fn resolve(mut self) -> Self {
        if self.files.is_empty() {
            self.files = Self::default().files;
        }
        self
    }
}

/// Take the top-level suites out of every report, dropping the boolean
/// sentinel mochawesome writes for disabled suites and preserving both
/// inter- and intra-report order.
///
/// Ownership of the suites moves out; the reports keep their stats and
/// metadata for the later stages.
pub fn flatten_suites(reports: &mut [Report]) -> Vec<Suite> {
    reports
        .iter_mut()
        .flat_map(|report| std::mem::take(&mut report.results))
        .filter_map(|entry| match entry {
            SuiteEntry::Suite(suite) => Some(*suite),
            SuiteEntry::Disabled(_) => None,
        })
        .collect()
}

/// Merge every report selected by `options` into one consolidated report,
/// attaching the given artifact records to their suites.
///
/// Any failure in any stage propagates unchanged; there is no retry and no
/// partial output.
pub async fn merge(
    options: MergeOptions,
    artifacts: Vec<ArtifactRecord>,
) -> Result<MergedReport, MergeError> {
    let options = options.resolve();

    // 1. Resolve patterns and load every shard.
    let files = source::collect_source_files(&options.files)?;
    let mut reports = source::load_reports(&files).await?;

    // 2. One flat forest of top-level suites, in encounter order.
    let mut suites = flatten_suites(&mut reports);

    // 3. Correlate runner artifacts, then recompute the summary block.
    attach_artifacts(&mut suites, artifacts, &KeyExtractor::default())?;
    let stats = generate_stats(&suites, &reports)?;

    let meta = reports
        .into_iter()
        .next()
        .map_or(Value::Null, |report| report.meta);

    Ok(MergedReport {
        stats,
        results: suites,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::ReportStats;
    use serde_json::{json, Map};

    fn entry_for(full_file: &str, states: &[&str]) -> SuiteEntry {
        SuiteEntry::Suite(Box::new(Suite {
            full_file: full_file.to_string(),
            tests: states
                .iter()
                .map(|state| crate::report::types::Test {
                    state: Some((*state).to_string()),
                    extra: Map::new(),
                })
                .collect(),
            suites: Vec::new(),
            video_path: None,
            screenshot_path: None,
            extra: Map::new(),
        }))
    }

    #[test]
    fn test_resolve_defaults_when_no_patterns_given() {
        let options = MergeOptions { files: Vec::new() }.resolve();
        assert_eq!(options.files, ["./mochawesome-report/mochawesome*.json"]);

        let options = MergeOptions {
            files: vec!["shard-*.json".to_string()],
        }
        .resolve();
        assert_eq!(options.files, ["shard-*.json"]);
    }

    #[test]
    fn test_flatten_drops_sentinels_and_keeps_order() {
        let mut reports = vec![
            Report {
                meta: Value::Null,
                stats: ReportStats {
                    start: "2024-01-01T00:00:00Z".to_string(),
                    end: "2024-01-01T00:01:00Z".to_string(),
                },
                results: vec![
                    entry_for("cypress/e2e/g1/a.cy.ts", &[]),
                    SuiteEntry::Disabled(false),
                    entry_for("cypress/e2e/g1/b.cy.ts", &[]),
                ],
            },
            Report {
                meta: Value::Null,
                stats: ReportStats {
                    start: "2024-01-01T00:00:00Z".to_string(),
                    end: "2024-01-01T00:01:00Z".to_string(),
                },
                results: vec![entry_for("cypress/e2e/g2/c.cy.ts", &[])],
            },
        ];

        let suites = flatten_suites(&mut reports);
        let files: Vec<_> = suites.iter().map(|s| s.full_file.as_str()).collect();
        assert_eq!(
            files,
            [
                "cypress/e2e/g1/a.cy.ts",
                "cypress/e2e/g1/b.cy.ts",
                "cypress/e2e/g2/c.cy.ts"
            ]
        );
        assert!(reports.iter().all(|r| r.results.is_empty()));
    }

    #[tokio::test]
    async fn test_merge_end_to_end() {
        let dir = tempfile::tempdir().unwrap();

        let shard1 = json!({
            "meta": {"shard": "first"},
            "stats": {"start": "2024-01-01T00:00:00Z", "end": "2024-01-01T00:01:00Z"},
            "results": [{
                "title": "login",
                "fullFile": "/ci/repo/cypress/e2e/auth/login.cy.ts",
                "tests": [{"state": "passed"}, {"state": "failed"}],
                "suites": []
            }]
        });
        let shard2 = json!({
            "meta": {"shard": "second"},
            "stats": {"start": "2024-01-01T00:00:30Z", "end": "2024-01-01T00:02:00Z"},
            "results": [
                false,
                {
                    "title": "checkout",
                    "fullFile": "/ci/repo/cypress/e2e/shop/checkout.cy.ts",
                    "tests": [{"state": "passed"}],
                    "suites": [{
                        "fullFile": "/ci/repo/cypress/e2e/shop/checkout.cy.ts",
                        "tests": [{"state": "pending"}],
                        "suites": []
                    }]
                }
            ]
        });
        std::fs::write(dir.path().join("mochawesome_1.json"), shard1.to_string()).unwrap();
        std::fs::write(dir.path().join("mochawesome_2.json"), shard2.to_string()).unwrap();

        // Runner emit order is the reverse of report order.
        let artifacts = vec![
            ArtifactRecord {
                file_path: "cypress\\e2e\\shop\\checkout.cy.ts".to_string(),
                video_path: "videos/checkout.mp4".to_string(),
                screenshots: json!(["screens/checkout.png"]),
            },
            ArtifactRecord {
                file_path: "cypress/e2e/auth/login.cy.ts".to_string(),
                video_path: "videos/login.mp4".to_string(),
                screenshots: Value::Null,
            },
        ];

        let options = MergeOptions {
            files: vec![format!("{}/mochawesome*.json", dir.path().display())],
        };
        let merged = merge(options, artifacts).await.unwrap();

        assert_eq!(merged.meta, json!({"shard": "first"}));
        assert_eq!(merged.stats.suites, 2);
        assert_eq!(merged.stats.tests, 4);
        assert_eq!(merged.stats.passes, 2);
        assert_eq!(merged.stats.pending, 1);
        assert_eq!(merged.stats.failures, 1);
        assert_eq!(merged.stats.start, "2024-01-01T00:00:00.000Z");
        assert_eq!(merged.stats.end, "2024-01-01T00:02:00.000Z");
        assert_eq!(merged.stats.duration, 120_000);

        assert_eq!(
            merged.results[0].video_path.as_deref(),
            Some("videos/login.mp4")
        );
        assert_eq!(
            merged.results[1].video_path.as_deref(),
            Some("videos/checkout.mp4")
        );
        assert_eq!(
            merged.results[1].screenshot_path,
            Some(json!(["screens/checkout.png"]))
        );

        // Suite passthrough fields survive serialization alongside the
        // attached artifact references.
        let serialized = serde_json::to_value(&merged).unwrap();
        assert_eq!(serialized["results"][0]["title"], "login");
        assert_eq!(
            serialized["results"][1]["videoPath"],
            "videos/checkout.mp4"
        );
    }

    #[tokio::test]
    async fn test_merge_fails_on_empty_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let options = MergeOptions {
            files: vec![format!("{}/none-*.json", dir.path().display())],
        };

        let err = merge(options, Vec::new()).await.unwrap_err();
        assert!(matches!(err, MergeError::NoMatch { .. }));
    }
}
