use chrono::{DateTime, SecondsFormat, Utc};

use super::types::{MergedStats, Report, Suite, Test};
use crate::error::MergeError;

/// Collect every leaf test under `suite`, pre-order: the suite's own tests
/// first, then each child suite's tests recursively, in listed order.
pub fn collect_tests(suite: &Suite) -> Vec<&Test> {
    let mut tests = Vec::new();
    push_tests(suite, &mut tests);
    tests
}

fn push_tests<'a>(suite: &'a Suite, out: &mut Vec<&'a Test>) {
    out.extend(suite.tests.iter());
    for child in &suite.suites {
        push_tests(child, out);
    }
}

fn count_state(tests: &[&Test], state: &str) -> usize {
    tests
        .iter()
        .filter(|test| test.state.as_deref() == Some(state))
        .count()
}

/// Compute the merged summary block over the flattened suite roots and the
/// source reports' time spans.
///
/// `passPercent`/`pendingPercent` use the full test count as denominator,
/// so failed and skipped tests lower both percentages; with zero tests they
/// come out non-finite (serialized as null) rather than zero. `other` and
/// `hasOther` are fixed placeholders the consuming dashboard still expects.
pub fn generate_stats(suites: &[Suite], reports: &[Report]) -> Result<MergedStats, MergeError> {
    let tests: Vec<&Test> = suites.iter().flat_map(collect_tests).collect();

    let passes = count_state(&tests, "passed");
    let pending = count_state(&tests, "pending");
    let failures = count_state(&tests, "failed");
    let skipped = count_state(&tests, "skipped");

    let span = merged_time_span(reports)?;

    Ok(MergedStats {
        suites: suites.len(),
        tests: tests.len(),
        passes,
        pending,
        failures,
        tests_registered: tests.len(),
        pass_percent: passes as f64 * 100.0 / tests.len() as f64,
        pending_percent: pending as f64 * 100.0 / tests.len() as f64,
        other: 0,
        has_other: false,
        skipped,
        has_skipped: skipped > 0,
        start: to_iso(span.start),
        end: to_iso(span.end),
        duration: (span.end - span.start).num_milliseconds(),
    })
}

struct TimeSpan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Union of the reports' own run spans: earliest start, latest end.
///
/// Min/max reduction is associative and commutative, so report order does
/// not affect the result. Zero reports leave the reduction without an
/// identity element and fail loudly instead of defaulting to a zero span.
fn merged_time_span(reports: &[Report]) -> Result<TimeSpan, MergeError> {
    let spans = reports
        .iter()
        .map(|report| {
            Ok(TimeSpan {
                start: parse_timestamp(&report.stats.start)?,
                end: parse_timestamp(&report.stats.end)?,
            })
        })
        .collect::<Result<Vec<_>, MergeError>>()?;

    spans
        .into_iter()
        .reduce(|acc, span| TimeSpan {
            start: acc.start.min(span.start),
            end: acc.end.max(span.end),
        })
        .ok_or(MergeError::NoReports)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MergeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| MergeError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
