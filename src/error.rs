use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures surfaced by the merge pipeline.
///
/// Every variant aborts the merge as a whole; nothing is retried and no
/// partial report is produced.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A glob pattern matched no report files.
    #[error("Pattern {pattern} matched no report files")]
    NoMatch { pattern: String },

    /// A glob pattern could not be parsed.
    #[error("Invalid file pattern {pattern}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A resolved report file could not be read.
    #[error("Failed to read report file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A resolved report file did not parse as report JSON.
    #[error("Failed to parse report file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A report carried a `stats.start`/`stats.end` value that is not an
    /// ISO-8601 timestamp.
    #[error("Invalid report timestamp {value:?}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A suite or artifact path carried no recognizable spec-file segment.
    #[error("No spec file segment found in path {path:?}")]
    KeyExtraction { path: String },

    /// Zero reports were selected; the merged time span is undefined.
    #[error("Cannot merge zero reports")]
    NoReports,
}
