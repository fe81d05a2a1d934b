use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An issue as returned by the `/repos/{owner}/{repo}/issues/{number}` endpoint.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    /// GitHub sends `null` for issues created without a body.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Request body for create and update.
#[derive(Serialize, Debug, PartialEq)]
pub struct IssueFields<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

/// Request body for close and reopen.
#[derive(Serialize, Debug, PartialEq)]
pub struct StateChange {
    pub state: IssueState,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
