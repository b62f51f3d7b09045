use regex::Regex;

use crate::error::MergeError;
use crate::report::types::{ArtifactRecord, Suite};

/// Derives the identity key linking a suite to its artifact record.
///
/// Both sides normalize `\` to `/` and keep the trailing spec-file segment
/// their paths share. The default is the Cypress e2e layout; runners with a
/// different tree shape can supply their own pattern without touching the
/// matching loop.
#[derive(Debug, Clone)]
pub struct KeyExtractor {
    pattern: Regex,
}

impl KeyExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// The Cypress e2e layout: a two-level directory path ending in a
    /// `.cy.ts` spec file, e.g. `cypress/e2e/auth/login.cy.ts`.
    pub fn cypress() -> Self {
        Self::new(Regex::new(r"cypress/e2e/[^/]+/[^/]+\.cy\.ts$").unwrap())
    }

    /// Extract the key segment from a suite or artifact path.
    ///
    /// A path without the expected segment is a hard failure; correlation
    /// cannot silently guess an identity.
    pub fn extract(&self, path: &str) -> Result<String, MergeError> {
        let normalized = path.replace('\\', "/");
        self.pattern
            .find(&normalized)
            .map(|segment| segment.as_str().to_string())
            .ok_or_else(|| MergeError::KeyExtraction {
                path: path.to_string(),
            })
    }
}

impl Default for KeyExtractor {
    fn default() -> Self {
        Self::cypress()
    }
}

/// Attach video/screenshot references to suites in a single left-to-right
/// pass.
///
/// The caller's artifact list is reversed once up front: the runner emits
/// records in the opposite order to the report producer. One cursor walks
/// the reversed list and advances only on a key match; a suite whose key
/// does not match the pending record is skipped with the cursor held, and
/// the scan stops as soon as every record is consumed. Greedy and
/// non-backtracking, not a full join.
pub fn attach_artifacts(
    suites: &mut [Suite],
    mut artifacts: Vec<ArtifactRecord>,
    keys: &KeyExtractor,
) -> Result<(), MergeError> {
    artifacts.reverse();

    let mut cursor = 0;
    for suite in suites.iter_mut() {
        if cursor >= artifacts.len() {
            break;
        }
        let record = &artifacts[cursor];
        if keys.extract(&suite.full_file)? == keys.extract(&record.file_path)? {
            suite.video_path = Some(record.video_path.clone());
            suite.screenshot_path = Some(record.screenshots.clone());
            cursor += 1;
        }
    }

    if cursor < artifacts.len() {
        log::debug!(
            "{} artifact record(s) had no matching suite",
            artifacts.len() - cursor
        );
    }

    Ok(())
}
