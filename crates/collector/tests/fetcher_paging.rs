use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use collector::client::{GithubApiError, GithubClient, IssueState, RepoName};
use collector::fetcher::RepoFetcher;
use http::StatusCode;
use serde_json::{json, Value};

#[derive(Default)]
struct StubClient {
    commits: Vec<Value>,
    issues: Vec<Value>,
    commit_pages: Mutex<Vec<u32>>,
    issue_calls: Mutex<Vec<(IssueState, u32)>>,
}

impl StubClient {
    fn with_commits(commits: Vec<Value>) -> Self {
        Self {
            commits,
            ..Self::default()
        }
    }

    fn with_issues(issues: Vec<Value>) -> Self {
        Self {
            issues,
            ..Self::default()
        }
    }
}

fn page_of(items: &[Value], page: u32, per_page: u32) -> Vec<Value> {
    let start = ((page - 1) * per_page) as usize;
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl GithubClient for StubClient {
    async fn list_commits(
        &self,
        _owner: &str,
        _repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        self.commit_pages.lock().unwrap().push(page);
        Ok(page_of(&self.commits, page, per_page))
    }

    async fn list_issues(
        &self,
        _owner: &str,
        _repo: &str,
        state: IssueState,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        self.issue_calls.lock().unwrap().push((state, page));
        let filtered: Vec<Value> = self
            .issues
            .iter()
            .filter(|issue| state == IssueState::All || issue["state"] == state.as_str())
            .cloned()
            .collect();
        Ok(page_of(&filtered, page, per_page))
    }
}

struct FailingClient;

#[async_trait]
impl GithubClient for FailingClient {
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>> {
        let endpoint = format!("repos/{owner}/{repo}/commits");
        Err(GithubApiError::status(StatusCode::NOT_FOUND, endpoint).into())
    }

    async fn list_issues(
        &self,
        _owner: &str,
        _repo: &str,
        _state: IssueState,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<Value>> {
        unreachable!()
    }
}

fn commit_json(sha: &str, author: &str, days_ago: i64, message: &str) -> Value {
    let date = Utc::now() - Duration::days(days_ago);
    json!({
        "sha": sha,
        "commit": {
            "author": {
                "name": author,
                "email": format!("{}@example.com", author.to_lowercase()),
                "date": date.to_rfc3339(),
            },
            "message": message,
        },
    })
}

fn issue_json(
    number: i64,
    title: &str,
    state: &str,
    created_at: chrono::DateTime<Utc>,
    closed_at: Option<chrono::DateTime<Utc>>,
    is_pr: bool,
) -> Value {
    let mut value = json!({
        "id": 9000 + number,
        "number": number,
        "title": title,
        "user": {"login": "alice"},
        "state": state,
        "created_at": created_at.to_rfc3339(),
        "closed_at": closed_at.map(|ts| ts.to_rfc3339()),
        "comments": 1,
    });
    if is_pr {
        value["pull_request"] = json!({"url": "https://api.github.com/repos/o/r/pulls/1"});
    }
    value
}

fn repo() -> RepoName {
    RepoName::parse("owner/example").unwrap()
}

#[tokio::test]
async fn fetch_commits_basic() -> Result<()> {
    let client = Arc::new(StubClient::with_commits(vec![
        commit_json("sha1", "Alice", 0, "Initial commit\nDetails"),
        commit_json("sha2", "Bob", 1, "Bug fix"),
    ]));
    let fetcher = RepoFetcher::new(client, 100);

    let commits = fetcher.fetch_commits(&repo(), None).await?;
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].message, "Initial commit");
    assert_eq!(commits[1].author, "Bob");
    assert!(commits[0].date.ends_with("+00:00"));
    Ok(())
}

#[tokio::test]
async fn fetch_commits_cap_keeps_first_entries_and_stops_paging() -> Result<()> {
    let raw: Vec<Value> = ["Alice", "Bob", "Charlie", "David", "Eve"]
        .iter()
        .enumerate()
        .map(|(i, name)| commit_json(&format!("sha{}", i + 1), name, i as i64, "Commit"))
        .collect();
    let client = Arc::new(StubClient::with_commits(raw));
    let fetcher = RepoFetcher::new(client.clone(), 2);

    let commits = fetcher.fetch_commits(&repo(), Some(3)).await?;
    let shas: Vec<_> = commits.iter().map(|c| c.sha.as_str()).collect();
    assert_eq!(shas, ["sha1", "sha2", "sha3"]);
    assert_eq!(*client.commit_pages.lock().unwrap(), [1, 2]);
    Ok(())
}

#[tokio::test]
async fn fetch_commits_walks_all_pages_without_cap() -> Result<()> {
    let raw: Vec<Value> = (1..=5)
        .map(|i| commit_json(&format!("sha{i}"), "Alice", i, "Commit"))
        .collect();
    let client = Arc::new(StubClient::with_commits(raw));
    let fetcher = RepoFetcher::new(client.clone(), 2);

    let commits = fetcher.fetch_commits(&repo(), None).await?;
    assert_eq!(commits.len(), 5);
    assert_eq!(*client.commit_pages.lock().unwrap(), [1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn fetch_commits_empty() -> Result<()> {
    let fetcher = RepoFetcher::new(Arc::new(StubClient::default()), 100);
    let commits = fetcher.fetch_commits(&repo(), None).await?;
    assert!(commits.is_empty());
    Ok(())
}

#[tokio::test]
async fn fetch_commits_surfaces_api_errors() {
    let fetcher = RepoFetcher::new(Arc::new(FailingClient), 100);
    let err = fetcher.fetch_commits(&repo(), None).await.unwrap_err();
    let api = err
        .downcast_ref::<GithubApiError>()
        .expect("api error kept in chain");
    assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(api.endpoint(), "repos/owner/example/commits");
}

#[tokio::test]
async fn fetch_issues_excludes_prs() -> Result<()> {
    let now = Utc::now();
    let client = Arc::new(StubClient::with_issues(vec![
        issue_json(1, "Bug report", "open", now, None, false),
        issue_json(
            2,
            "Feature request",
            "closed",
            now - Duration::days(1),
            Some(now),
            false,
        ),
        issue_json(3, "Pull request", "open", now, None, true),
    ]));
    let fetcher = RepoFetcher::new(client, 100);

    let issues = fetcher.fetch_issues(&repo(), IssueState::All, None).await?;
    let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Bug report", "Feature request"]);
    Ok(())
}

#[tokio::test]
async fn fetch_issues_cap_counts_only_issues() -> Result<()> {
    let now = Utc::now();
    let client = Arc::new(StubClient::with_issues(vec![
        issue_json(1, "PR one", "open", now, None, true),
        issue_json(2, "PR two", "open", now, None, true),
        issue_json(3, "First", "open", now, None, false),
        issue_json(4, "Second", "open", now, None, false),
        issue_json(5, "Third", "open", now, None, false),
    ]));
    let fetcher = RepoFetcher::new(client, 2);

    let issues = fetcher.fetch_issues(&repo(), IssueState::All, Some(2)).await?;
    let titles: Vec<_> = issues.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second"]);
    Ok(())
}

#[tokio::test]
async fn fetch_issues_passes_state_filter() -> Result<()> {
    let now = Utc::now();
    let client = Arc::new(StubClient::with_issues(vec![
        issue_json(1, "Open one", "open", now, None, false),
        issue_json(2, "Closed one", "closed", now - Duration::days(2), Some(now), false),
    ]));
    let fetcher = RepoFetcher::new(client.clone(), 100);

    let issues = fetcher.fetch_issues(&repo(), IssueState::Closed, None).await?;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].state, "closed");
    assert_eq!(
        *client.issue_calls.lock().unwrap(),
        [(IssueState::Closed, 1)]
    );
    Ok(())
}

#[tokio::test]
async fn fetch_issues_open_duration_calculation() -> Result<()> {
    let now = Utc::now();
    let created_at = now - Duration::days(10) - Duration::hours(12);
    let closed_at = now - Duration::days(3) - Duration::hours(6);
    let client = Arc::new(StubClient::with_issues(vec![
        issue_json(1, "Closed issue", "closed", created_at, Some(closed_at), false),
        issue_json(2, "Open issue", "open", now - Duration::days(5), None, false),
    ]));
    let fetcher = RepoFetcher::new(client, 100);

    let issues = fetcher.fetch_issues(&repo(), IssueState::All, None).await?;
    assert_eq!(issues[0].open_duration_days, Some(7));
    assert_eq!(issues[1].open_duration_days, None);
    assert!(issues[0].created_at.as_deref().unwrap().contains('T'));
    Ok(())
}

#[tokio::test]
async fn fetched_issues_round_trip_through_csv() -> Result<()> {
    let now = Utc::now();
    let client = Arc::new(StubClient::with_issues(vec![
        issue_json(
            1,
            "Closed, with comma",
            "closed",
            now - Duration::days(4),
            Some(now),
            false,
        ),
        issue_json(2, "Open", "open", now, None, false),
    ]));
    let fetcher = RepoFetcher::new(client, 100);
    let issues = fetcher.fetch_issues(&repo(), IssueState::All, None).await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("issues.csv");
    dataset::write_issues(&path, &issues)?;
    assert_eq!(dataset::read_issues(&path)?, issues);
    Ok(())
}
