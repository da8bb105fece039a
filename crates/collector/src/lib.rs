pub mod client;
pub mod fetcher;

pub use client::{GithubClient, IssueState, RepoName, RestGithubClient};
pub use fetcher::RepoFetcher;
