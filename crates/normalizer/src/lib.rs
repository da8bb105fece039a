pub mod models;
pub mod payloads;
pub mod transform;

pub use models::{CommitRecord, IssueRecord};
pub use payloads::{CommitDetail, CommitPayload, GitIdentity, IssuePayload, UserRef};
pub use transform::{
    normalize_commit, normalize_commits, normalize_issue, normalize_issues, open_duration,
    CommitNormalizer, IssueNormalizer,
};
