use serde::{Deserialize, Deserializer, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const NO_MESSAGE: &str = "No message";

/// One row of the commits dataset. Field order is the column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub author: String,
    pub email: String,
    pub date: String,
    pub message: String,
}

impl CommitRecord {
    pub const COLUMNS: [&'static str; 5] = ["sha", "author", "email", "date", "message"];
}

/// One row of the issues dataset. Pull requests never become an
/// `IssueRecord`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueRecord {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub user: String,
    pub state: String,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub comments: i64,
    #[serde(deserialize_with = "deserialize_days")]
    pub open_duration_days: Option<i64>,
}

impl IssueRecord {
    pub const COLUMNS: [&'static str; 9] = [
        "id",
        "number",
        "title",
        "user",
        "state",
        "created_at",
        "closed_at",
        "comments",
        "open_duration_days",
    ];

    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Days {
    Int(i64),
    Float(f64),
    Text(String),
}

// Tables written by other tools store the column as a float ("7.0") with
// NaN or an empty cell for missing values.
fn deserialize_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let days = match Option::<Days>::deserialize(deserializer)? {
        None => None,
        Some(Days::Int(days)) => Some(days),
        Some(Days::Float(days)) if days.is_finite() => Some(days.trunc() as i64),
        Some(Days::Float(_)) => None,
        Some(Days::Text(text)) => {
            let text = text.trim();
            if text.is_empty() || text.eq_ignore_ascii_case("nan") {
                None
            } else {
                let parsed = text.parse::<f64>().map_err(serde::de::Error::custom)?;
                Some(parsed.trunc() as i64)
            }
        }
    };
    Ok(days)
}
