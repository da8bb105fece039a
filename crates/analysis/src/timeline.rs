use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use normalizer::{CommitRecord, IssueRecord};
use serde::Serialize;

use crate::errors::{AnalysisError, Result};

/// One row of the commits/issues outer join. At least one side is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub day: Option<NaiveDate>,
    pub commit: Option<CommitRecord>,
    pub issue: Option<IssueRecord>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Calendar day of a timestamp, taken in the timestamp's own offset.
pub fn day_key(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.date_naive());
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub(crate) fn commit_days(commits: &[CommitRecord]) -> Result<Vec<NaiveDate>> {
    commits
        .iter()
        .enumerate()
        .map(|(row, commit)| {
            day_key(&commit.date).ok_or_else(|| AnalysisError::InvalidTimestamp {
                dataset: "commits",
                row,
                value: commit.date.clone(),
            })
        })
        .collect()
}

/// Issues without `created_at` get no key; a present but unparseable value
/// is an error.
pub(crate) fn issue_days(issues: &[IssueRecord]) -> Result<Vec<Option<NaiveDate>>> {
    issues
        .iter()
        .enumerate()
        .map(|(row, issue)| match issue.created_at.as_deref() {
            None => Ok(None),
            Some(value) if value.trim().is_empty() => Ok(None),
            Some(value) => day_key(value)
                .map(Some)
                .ok_or_else(|| AnalysisError::InvalidTimestamp {
                    dataset: "issues",
                    row,
                    value: value.to_string(),
                }),
        })
        .collect()
}

#[derive(Default)]
struct DayBucket {
    commits: Vec<usize>,
    issues: Vec<usize>,
}

/// Full outer join on calendar day. Days sort ascending, issues without a
/// day come last, and input order is kept within a day.
pub fn outer_join_by_day(
    commits: &[CommitRecord],
    issues: &[IssueRecord],
) -> Result<Vec<MergedRow>> {
    let commit_keys = commit_days(commits)?;
    let issue_keys = issue_days(issues)?;

    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for (idx, day) in commit_keys.iter().enumerate() {
        buckets.entry(*day).or_default().commits.push(idx);
    }
    let mut undated = Vec::new();
    for (idx, day) in issue_keys.iter().enumerate() {
        match day {
            Some(day) => buckets.entry(*day).or_default().issues.push(idx),
            None => undated.push(idx),
        }
    }

    let mut merged = Vec::new();
    for (day, bucket) in buckets {
        match (bucket.commits.is_empty(), bucket.issues.is_empty()) {
            (false, false) => {
                for &c in &bucket.commits {
                    for &i in &bucket.issues {
                        merged.push(MergedRow {
                            day: Some(day),
                            commit: Some(commits[c].clone()),
                            issue: Some(issues[i].clone()),
                        });
                    }
                }
            }
            (false, true) => merged.extend(bucket.commits.iter().map(|&c| MergedRow {
                day: Some(day),
                commit: Some(commits[c].clone()),
                issue: None,
            })),
            (true, false) => merged.extend(bucket.issues.iter().map(|&i| MergedRow {
                day: Some(day),
                commit: None,
                issue: Some(issues[i].clone()),
            })),
            (true, true) => {}
        }
    }
    merged.extend(undated.into_iter().map(|i| MergedRow {
        day: None,
        commit: None,
        issue: Some(issues[i].clone()),
    }));

    Ok(merged)
}
