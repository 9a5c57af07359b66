//! Menu issues and freeform feedback.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use lunchline_core::{CommentId, IssueId, IssueStatus, UserId};

/// A complaint about a specific day's menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuIssue {
    pub id: IssueId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub text: String,
    pub status: IssueStatus,
    pub chef_response: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Freeform feedback with an append-only response thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author_name: String,
    pub text: String,
    pub responses: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
}

/// One response on a comment thread. Responses are never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
