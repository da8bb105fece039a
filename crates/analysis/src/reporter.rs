use std::fmt;

use normalizer::{CommitRecord, IssueRecord};
use serde::Serialize;
use tracing::info;

use crate::errors::Result;
use crate::stats::{average_open_duration, close_rate, top_committers, CommitterCount};
use crate::timeline::{outer_join_by_day, MergedRow};

/// Rates and averages are kept unrounded; `Display` rounds them to one
/// decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub top_committers: Vec<CommitterCount>,
    pub total_issues: usize,
    pub closed_issues: usize,
    pub close_rate: f64,
    pub avg_open_duration_days: Option<f64>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top 5 committers:")?;
        if self.top_committers.is_empty() {
            writeln!(f, "  (no commits)")?;
        }
        for entry in &self.top_committers {
            writeln!(f, "  {}: {} commits", entry.author, entry.commits)?;
        }
        writeln!(f, "Issue close rate: {:.1}%", self.close_rate)?;
        match self.avg_open_duration_days {
            Some(days) => write!(f, "Avg. issue open duration: {days:.1} days"),
            None => write!(f, "Avg. issue open duration: N/A"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub summary: Summary,
    pub merged: Vec<MergedRow>,
}

pub struct SummaryReporter {
    top_n: usize,
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

impl SummaryReporter {
    /// Fails without producing any statistics if a commit date or issue
    /// creation time cannot be parsed.
    pub fn summarize(
        &self,
        commits: &[CommitRecord],
        issues: &[IssueRecord],
    ) -> Result<SummaryReport> {
        let merged = outer_join_by_day(commits, issues)?;

        let summary = Summary {
            top_committers: top_committers(commits, self.top_n),
            total_issues: issues.len(),
            closed_issues: issues.iter().filter(|issue| issue.is_closed()).count(),
            close_rate: close_rate(issues),
            avg_open_duration_days: average_open_duration(issues),
        };
        info!(
            commits = commits.len(),
            issues = issues.len(),
            merged_rows = merged.len(),
            "summary computed"
        );

        Ok(SummaryReport { summary, merged })
    }
}

pub fn summarize(commits: &[CommitRecord], issues: &[IssueRecord]) -> Result<SummaryReport> {
    SummaryReporter::default().summarize(commits, issues)
}
