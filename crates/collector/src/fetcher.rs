use std::sync::Arc;

use anyhow::{Context, Result};
use normalizer::{
    CommitNormalizer, CommitPayload, CommitRecord, IssueNormalizer, IssuePayload, IssueRecord,
};
use tracing::{debug, info, instrument, warn};

use crate::client::{GithubApiError, GithubClient, IssueState, RepoName};

/// Walks the paginated listings and feeds each entry to a normalizer.
/// Paging stops once the normalizer holds `max` records or the server
/// returns a short page.
pub struct RepoFetcher {
    client: Arc<dyn GithubClient>,
    per_page: u32,
}

impl RepoFetcher {
    pub fn new(client: Arc<dyn GithubClient>, per_page: u32) -> Self {
        Self {
            client,
            per_page: per_page.clamp(1, 100),
        }
    }

    #[instrument(skip(self), fields(repo = %repo))]
    pub async fn fetch_commits(
        &self,
        repo: &RepoName,
        max: Option<usize>,
    ) -> Result<Vec<CommitRecord>> {
        let mut normalizer = CommitNormalizer::new(max);
        let mut page = 1u32;
        let mut pages = 0u32;

        while !normalizer.is_full() {
            let items = self
                .client
                .list_commits(&repo.owner, &repo.name, page, self.per_page)
                .await
                .map_err(report_api_error)
                .with_context(|| format!("listing commits page {page} of {repo}"))?;
            pages += 1;
            let last_page = items.len() < self.per_page as usize;
            debug!(page, items = items.len(), "commit page received");

            for value in items {
                if normalizer.is_full() {
                    break;
                }
                let payload: CommitPayload =
                    serde_json::from_value(value).context("decoding commit payload")?;
                normalizer.push(&payload);
            }

            if last_page {
                break;
            }
            page += 1;
        }

        let records = normalizer.finish();
        info!(count = records.len(), pages, "commits fetched");
        Ok(records)
    }

    #[instrument(skip(self), fields(repo = %repo, state = state.as_str()))]
    pub async fn fetch_issues(
        &self,
        repo: &RepoName,
        state: IssueState,
        max: Option<usize>,
    ) -> Result<Vec<IssueRecord>> {
        let mut normalizer = IssueNormalizer::new(max);
        let mut page = 1u32;
        let mut pages = 0u32;

        while !normalizer.is_full() {
            let items = self
                .client
                .list_issues(&repo.owner, &repo.name, state, page, self.per_page)
                .await
                .map_err(report_api_error)
                .with_context(|| format!("listing issues page {page} of {repo}"))?;
            pages += 1;
            let last_page = items.len() < self.per_page as usize;
            debug!(page, items = items.len(), "issue page received");

            for value in items {
                if normalizer.is_full() {
                    break;
                }
                let payload: IssuePayload =
                    serde_json::from_value(value).context("decoding issue payload")?;
                normalizer.push(&payload);
            }

            if last_page {
                break;
            }
            page += 1;
        }

        let skipped = normalizer.skipped_pull_requests();
        let records = normalizer.finish();
        info!(
            count = records.len(),
            skipped_pull_requests = skipped,
            pages,
            "issues fetched"
        );
        Ok(records)
    }
}

fn report_api_error(err: anyhow::Error) -> anyhow::Error {
    if let Some(api) = err.downcast_ref::<GithubApiError>() {
        warn!(endpoint = api.endpoint(), status = %api.status_code(), "github request rejected");
    }
    err
}
