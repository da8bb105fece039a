//! Shapes of the raw GitHub REST payloads. Only the fields the normalizers
//! read are declared; everything else in the response is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CommitPayload {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitDetail {
    pub author: Option<GitIdentity>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Git-level author identity, as opposed to the linked GitHub account.
#[derive(Debug, Clone, Deserialize)]
pub struct GitIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub id: i64,
    pub number: i64,
    pub title: Option<String>,
    pub user: Option<UserRef>,
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments: Option<i64>,
    pub pull_request: Option<serde_json::Value>,
}

impl IssuePayload {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.as_ref().is_some_and(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: Option<String>,
}
