use std::collections::HashMap;

use normalizer::{CommitRecord, IssueRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitterCount {
    pub author: String,
    pub commits: usize,
}

/// Authors ranked by commit count. Equal counts keep first-seen order.
pub fn top_committers(commits: &[CommitRecord], limit: usize) -> Vec<CommitterCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CommitterCount> = Vec::new();

    for commit in commits {
        match positions.get(commit.author.as_str()) {
            Some(&pos) => counts[pos].commits += 1,
            None => {
                positions.insert(commit.author.as_str(), counts.len());
                counts.push(CommitterCount {
                    author: commit.author.clone(),
                    commits: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.commits.cmp(&a.commits));
    counts.truncate(limit);
    counts
}

/// Percentage of closed issues, unrounded. Zero issues is 0.0.
pub fn close_rate(issues: &[IssueRecord]) -> f64 {
    if issues.is_empty() {
        return 0.0;
    }
    let closed = issues.iter().filter(|issue| issue.is_closed()).count();
    closed as f64 / issues.len() as f64 * 100.0
}

/// Mean open duration of closed issues that have one, unrounded.
pub fn average_open_duration(issues: &[IssueRecord]) -> Option<f64> {
    let durations: Vec<i64> = issues
        .iter()
        .filter(|issue| issue.is_closed())
        .filter_map(|issue| issue.open_duration_days)
        .collect();
    if durations.is_empty() {
        return None;
    }
    let total: i64 = durations.iter().sum();
    Some(total as f64 / durations.len() as f64)
}
