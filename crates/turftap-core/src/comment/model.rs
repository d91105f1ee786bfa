//! Comment data models

use crate::error::{Result, TurftapError};
use crate::types::{CommentId, ListingId, UserId};
use crate::user::AuthorSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A comment on a listing, stored flat with an optional parent link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub listing_id: ListingId,
    pub author_id: UserId,
    /// Trimmed, never empty
    pub content: String,
    /// Parent comment on the same listing, `None` for a root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Stored but not driven by any voting flow
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    pub created_at: DateTime<Utc>,
    /// Set on the last edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Replace the content and stamp the edit time
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Some(Utc::now());
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

/// Display order for comments: newest first, id breaks ties
pub fn newest_first(a: &Comment, b: &Comment) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// A comment with its author's display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    /// `None` when the author is no longer in the directory
    pub author: Option<AuthorSummary>,
}

/// A node in a listing's reply forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentNode {
    #[serde(flatten)]
    pub view: CommentView,
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    pub fn id(&self) -> CommentId {
        self.view.comment.id
    }

    /// Number of comments in this subtree, including the node itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.replies.iter());
        }
        count
    }
}

/// Result of a cascading delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// The deleted comment plus all of its transitive replies
    pub deleted_count: usize,
}

/// Loosely-typed add request as it arrives from a handler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddCommentRequest {
    pub listing_id: Option<String>,
    pub content: Option<String>,
    pub parent_id: Option<String>,
}

/// Validated add request
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub listing_id: ListingId,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

impl AddCommentRequest {
    /// Check required fields and parse identifiers
    pub fn parse(&self) -> Result<NewComment> {
        let listing_id: ListingId = required(&self.listing_id, "listingId")?.parse()?;
        let content = required(&self.content, "content")?.to_string();
        let parent_id = match self.parent_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<CommentId>()?),
            _ => None,
        };
        Ok(NewComment {
            listing_id,
            content,
            parent_id,
        })
    }
}

/// Loosely-typed edit request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditCommentRequest {
    pub comment_id: Option<String>,
    pub content: Option<String>,
}

impl EditCommentRequest {
    pub fn parse(&self) -> Result<(CommentId, String)> {
        let id: CommentId = required(&self.comment_id, "commentId")?.parse()?;
        let content = required(&self.content, "content")?.to_string();
        Ok((id, content))
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TurftapError::Validation(format!("{} is required", field)))
}
