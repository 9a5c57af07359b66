//! Menu issues and freeform feedback.

use chrono::{NaiveDate, Utc};

use lunchline_core::{CommentId, IssueId, IssueStatus, UserId};

use crate::models::{Comment, CommentResponse, MenuIssue};

use super::{Store, next_time_id};

impl Store {
    // =========================================================================
    // Selectors
    // =========================================================================

    /// All issues, newest first.
    pub async fn issues(&self) -> Vec<MenuIssue> {
        let mut issues = self.inner.read().await.issues.clone();
        issues.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        issues
    }

    /// Count of unread open issues (kitchen badge).
    pub async fn unread_issue_count(&self) -> usize {
        self.inner
            .read()
            .await
            .issues
            .iter()
            .filter(|i| !i.is_read && i.status == IssueStatus::Open)
            .count()
    }

    /// All comments, newest first.
    pub async fn comments(&self) -> Vec<Comment> {
        let mut comments = self.inner.read().await.comments.clone();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    // =========================================================================
    // Issues
    // =========================================================================

    /// File an issue against a date's menu.
    ///
    /// Requires non-blank text and a known reporter; returns `None` when
    /// either is missing.
    pub async fn report_issue(
        &self,
        user_id: UserId,
        date: NaiveDate,
        text: &str,
    ) -> Option<MenuIssue> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let issue = {
            let mut c = self.inner.write().await;
            if !c.users.iter().any(|u| u.id == user_id) {
                tracing::warn!(user = %user_id, "issue report from unknown user");
                return None;
            }
            let issue = MenuIssue {
                id: IssueId::new(next_time_id(&c.issues, |i| i.id.as_i64())),
                user_id,
                date,
                text: text.to_owned(),
                status: IssueStatus::Open,
                chef_response: None,
                is_read: false,
                created_at: Utc::now(),
            };
            c.issues.push(issue.clone());
            issue
        };

        self.persist_issue(issue.clone());
        Some(issue)
    }

    /// Resolve an issue, optionally attaching a chef response.
    pub async fn resolve_issue(&self, id: IssueId, chef_response: Option<String>) -> bool {
        let issue = {
            let mut c = self.inner.write().await;
            let Some(issue) = c.issues.iter_mut().find(|i| i.id == id) else {
                return false;
            };
            issue.status = IssueStatus::Resolved;
            if let Some(response) = chef_response.filter(|r| !r.trim().is_empty()) {
                issue.chef_response = Some(response);
            }
            issue.is_read = true;
            issue.clone()
        };

        self.persist_issue(issue);
        true
    }

    /// Mark an issue read without resolving it.
    pub async fn mark_issue_read(&self, id: IssueId) -> bool {
        let issue = {
            let mut c = self.inner.write().await;
            let Some(issue) = c.issues.iter_mut().find(|i| i.id == id) else {
                return false;
            };
            issue.is_read = true;
            issue.clone()
        };

        self.persist_issue(issue);
        true
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Post a freeform comment.
    pub async fn add_comment(&self, author_name: String, text: String) -> Comment {
        let comment = {
            let mut c = self.inner.write().await;
            let comment = Comment {
                id: CommentId::new(next_time_id(&c.comments, |x| x.id.as_i64())),
                author_name,
                text,
                responses: Vec::new(),
                created_at: Utc::now(),
            };
            c.comments.push(comment.clone());
            comment
        };

        self.persist_comment(comment.clone());
        comment
    }

    /// Append a response to a comment thread (responses are append-only).
    pub async fn add_comment_response(
        &self,
        id: CommentId,
        author_name: String,
        text: String,
    ) -> bool {
        let comment = {
            let mut c = self.inner.write().await;
            let Some(comment) = c.comments.iter_mut().find(|x| x.id == id) else {
                return false;
            };
            comment.responses.push(CommentResponse {
                author_name,
                text,
                created_at: Utc::now(),
            });
            comment.clone()
        };

        self.persist_comment(comment);
        true
    }

    fn persist_issue(&self, issue: MenuIssue) {
        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_issue(&issue).await {
                    tracing::error!("failed to persist issue {}: {e}", issue.id);
                }
            });
        }
    }

    fn persist_comment(&self, comment: Comment) {
        if let Some(backend) = self.backend.clone() {
            tokio::spawn(async move {
                if let Err(e) = backend.upsert_comment(&comment).await {
                    tracing::error!("failed to persist comment {}: {e}", comment.id);
                }
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{offline_store, test_user};
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_report_issue_requires_text_and_known_user() {
        let store = offline_store();
        let user = store
            .create_user(test_user(0, "mlopez", "maria@example.com", false))
            .await;

        assert!(store.report_issue(user.id, date(), "   ").await.is_none());
        assert!(
            store
                .report_issue(UserId::new(999), date(), "soup was cold")
                .await
                .is_none()
        );
        let issue = store
            .report_issue(user.id, date(), "  soup was cold  ")
            .await
            .unwrap();
        assert_eq!(issue.text, "soup was cold");
        assert_eq!(issue.status, IssueStatus::Open);
    }

    #[tokio::test]
    async fn test_resolve_issue_attaches_response_and_marks_read() {
        let store = offline_store();
        let user = store
            .create_user(test_user(0, "mlopez", "maria@example.com", false))
            .await;
        let issue = store
            .report_issue(user.id, date(), "soup was cold")
            .await
            .unwrap();

        assert_eq!(store.unread_issue_count().await, 1);
        assert!(
            store
                .resolve_issue(issue.id, Some("New thermos pots ordered".to_owned()))
                .await
        );
        assert_eq!(store.unread_issue_count().await, 0);

        let resolved = store.issues().await.into_iter().next().unwrap();
        assert_eq!(resolved.status, IssueStatus::Resolved);
        assert_eq!(
            resolved.chef_response.as_deref(),
            Some("New thermos pots ordered")
        );
        assert!(resolved.is_read);
    }

    #[tokio::test]
    async fn test_comment_responses_append_only() {
        let store = offline_store();
        let comment = store
            .add_comment("Maria".to_owned(), "More vegan options please".to_owned())
            .await;

        assert!(
            store
                .add_comment_response(comment.id, "Chef".to_owned(), "Noted!".to_owned())
                .await
        );
        assert!(
            store
                .add_comment_response(comment.id, "Maria".to_owned(), "Thanks".to_owned())
                .await
        );
        assert!(
            !store
                .add_comment_response(CommentId::new(999), "X".to_owned(), "Y".to_owned())
                .await
        );

        let stored = store.comments().await.into_iter().next().unwrap();
        assert_eq!(stored.responses.len(), 2);
        assert_eq!(stored.responses.first().unwrap().author_name, "Chef");
    }
}
