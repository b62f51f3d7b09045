use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One parsed mochawesome report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Opaque reporter metadata. Only the first report's `meta` survives
    /// into the merged output.
    #[serde(default)]
    pub meta: Value,
    pub stats: ReportStats,
    #[serde(default)]
    pub results: Vec<SuiteEntry>,
}

/// The slice of a report's `stats` block the merge needs: the run's span.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub start: String,
    pub end: String,
}

/// Entry in a report's `results` array. Mochawesome writes a bare `false`
/// in place of a suite that was disabled or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SuiteEntry {
    Suite(Box<Suite>),
    Disabled(bool),
}

/// A suite tree node, tied to one source spec file.
///
/// Only the fields the merge touches are typed; everything else mochawesome
/// puts on a suite (title, uuid, duration, the per-state uuid arrays, ...)
/// rides along in `extra` and is re-emitted untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suite {
    #[serde(default)]
    pub full_file: String,
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub suites: Vec<Suite>,
    /// Attached during artifact correlation; absent before it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,
    /// Passthrough of the matched artifact's `screenshots` value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A leaf test execution record.
///
/// `state` stays a free string so states outside the four counted ones
/// survive passthrough unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Externally produced association between a spec file and its recorded
/// video/screenshot evidence. Supplied by the caller, never loaded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub file_path: String,
    pub video_path: String,
    #[serde(default)]
    pub screenshots: Value,
}

/// Summary counters recomputed over the merged suite forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedStats {
    pub suites: usize,
    pub tests: usize,
    pub passes: usize,
    pub pending: usize,
    pub failures: usize,
    pub tests_registered: usize,
    pub pass_percent: f64,
    pub pending_percent: f64,
    pub other: usize,
    pub has_other: bool,
    pub skipped: usize,
    pub has_skipped: bool,
    pub start: String,
    pub end: String,
    pub duration: i64,
}

/// The consolidated output: recomputed stats, the correlated suite forest,
/// and the first report's passthrough metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedReport {
    pub stats: MergedStats,
    pub results: Vec<Suite>,
    pub meta: Value,
}
