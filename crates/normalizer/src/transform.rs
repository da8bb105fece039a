use std::borrow::Borrow;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::trace;

use crate::models::{CommitRecord, IssueRecord, NO_MESSAGE, UNKNOWN};
use crate::payloads::{CommitPayload, IssuePayload};

pub fn normalize_commit(payload: &CommitPayload) -> CommitRecord {
    let (author, email, date) = match &payload.commit.author {
        Some(identity) => (
            identity.name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            identity.email.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            identity
                .date
                .as_ref()
                .map(iso_timestamp)
                .unwrap_or_else(|| UNKNOWN.to_string()),
        ),
        None => (UNKNOWN.to_string(), UNKNOWN.to_string(), UNKNOWN.to_string()),
    };

    CommitRecord {
        sha: payload.sha.clone(),
        author,
        email,
        date,
        message: first_line(payload.commit.message.as_deref()),
    }
}

/// Returns `None` for pull requests, which the issues endpoint also lists.
pub fn normalize_issue(payload: &IssuePayload) -> Option<IssueRecord> {
    if payload.is_pull_request() {
        return None;
    }

    Some(IssueRecord {
        id: payload.id,
        number: payload.number,
        title: payload.title.clone().unwrap_or_default(),
        user: payload
            .user
            .as_ref()
            .and_then(|u| u.login.clone())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        state: payload.state.clone(),
        created_at: payload.created_at.as_ref().map(iso_timestamp),
        closed_at: payload.closed_at.as_ref().map(iso_timestamp),
        comments: payload.comments.unwrap_or_default(),
        open_duration_days: match (payload.created_at, payload.closed_at) {
            (Some(created), Some(closed)) => Some(open_duration(created, closed)),
            _ => None,
        },
    })
}

/// Whole days between creation and closing, floored: 7 days and 23 hours is
/// 7, and a close 12 hours before creation is -1.
pub fn open_duration(created_at: DateTime<Utc>, closed_at: DateTime<Utc>) -> i64 {
    (closed_at - created_at).num_seconds().div_euclid(SECONDS_PER_DAY)
}

const SECONDS_PER_DAY: i64 = 86_400;

/// RFC 3339 with an explicit `+00:00` offset rather than `Z`.
fn iso_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn first_line(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => {
            message.split('\n').next().unwrap_or_default().to_string()
        }
        _ => NO_MESSAGE.to_string(),
    }
}

/// Accumulates commit rows up to an optional cap. Callers check `is_full`
/// before pulling more input so nothing is fetched past the cap.
#[derive(Debug, Default)]
pub struct CommitNormalizer {
    limit: Option<usize>,
    records: Vec<CommitRecord>,
}

impl CommitNormalizer {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            records: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.records.len() >= limit)
    }

    /// Returns false when the cap was already reached and the entry was dropped.
    pub fn push(&mut self, payload: &CommitPayload) -> bool {
        if self.is_full() {
            return false;
        }
        self.records.push(normalize_commit(payload));
        true
    }

    pub fn finish(self) -> Vec<CommitRecord> {
        self.records
    }
}

/// Same contract as [`CommitNormalizer`], except pull requests are skipped
/// before the cap is consulted and therefore never use up the limit.
#[derive(Debug, Default)]
pub struct IssueNormalizer {
    limit: Option<usize>,
    records: Vec<IssueRecord>,
    skipped_pull_requests: usize,
}

impl IssueNormalizer {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            records: Vec::new(),
            skipped_pull_requests: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.records.len() >= limit)
    }

    pub fn skipped_pull_requests(&self) -> usize {
        self.skipped_pull_requests
    }

    pub fn push(&mut self, payload: &IssuePayload) -> bool {
        if payload.is_pull_request() {
            trace!(number = payload.number, "skipping pull request");
            self.skipped_pull_requests += 1;
            return false;
        }
        if self.is_full() {
            return false;
        }
        match normalize_issue(payload) {
            Some(record) => {
                self.records.push(record);
                true
            }
            None => false,
        }
    }

    pub fn finish(self) -> Vec<IssueRecord> {
        self.records
    }
}

pub fn normalize_commits<I>(source: I, limit: Option<usize>) -> Vec<CommitRecord>
where
    I: IntoIterator,
    I::Item: Borrow<CommitPayload>,
{
    let mut normalizer = CommitNormalizer::new(limit);
    let mut source = source.into_iter();
    while !normalizer.is_full() {
        match source.next() {
            Some(payload) => {
                normalizer.push(payload.borrow());
            }
            None => break,
        }
    }
    normalizer.finish()
}

pub fn normalize_issues<I>(source: I, limit: Option<usize>) -> Vec<IssueRecord>
where
    I: IntoIterator,
    I::Item: Borrow<IssuePayload>,
{
    let mut normalizer = IssueNormalizer::new(limit);
    let mut source = source.into_iter();
    while !normalizer.is_full() {
        match source.next() {
            Some(payload) => {
                normalizer.push(payload.borrow());
            }
            None => break,
        }
    }
    normalizer.finish()
}
