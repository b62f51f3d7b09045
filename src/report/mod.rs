pub mod stats;
pub mod types;

pub use stats::{collect_tests, generate_stats};
pub use types::{
    ArtifactRecord, MergedReport, MergedStats, Report, ReportStats, Suite, SuiteEntry, Test,
};
