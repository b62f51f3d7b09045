use std::path::{Path, PathBuf};

use futures::future::try_join_all;

use crate::error::MergeError;
use crate::report::types::Report;

/// Expand every glob pattern into concrete report paths, in pattern order.
///
/// Fail-fast: a pattern matching nothing aborts the merge rather than
/// producing a partial file set. Matches are not deduplicated; overlapping
/// patterns contribute their files again.
pub fn collect_source_files(patterns: &[String]) -> Result<Vec<PathBuf>, MergeError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| MergeError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let matched: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
        if matched.is_empty() {
            return Err(MergeError::NoMatch {
                pattern: pattern.clone(),
            });
        }
        log::debug!("pattern {} matched {} file(s)", pattern, matched.len());
        files.extend(matched);
    }

    Ok(files)
}

/// Load every resolved report file, preserving input order.
///
/// The reads have no dependency on each other and are awaited concurrently;
/// results come back in request order regardless of completion order, and
/// any single failure fails the merge as a whole.
pub async fn load_reports(files: &[PathBuf]) -> Result<Vec<Report>, MergeError> {
    try_join_all(files.iter().map(|path| load_report(path))).await
}

async fn load_report(path: &Path) -> Result<Report, MergeError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| MergeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_slice(&bytes).map_err(|source| MergeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
