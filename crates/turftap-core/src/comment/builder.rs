//! Comment builder for fluent API

use super::model::Comment;
use crate::error::{Result, TurftapError};
use crate::types::{CommentId, ListingId, UserId};
use chrono::{DateTime, Utc};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    listing_id: ListingId,
    author_id: UserId,
    content: Option<String>,
    parent_id: Option<CommentId>,
    created_at: Option<DateTime<Utc>>,
}

impl CommentBuilder {
    /// Create a new builder for a root comment on `listing_id`
    pub fn new(listing_id: ListingId, author_id: UserId) -> Self {
        Self {
            listing_id,
            author_id,
            content: None,
            parent_id: None,
            created_at: None,
        }
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Make this a reply
    pub fn reply_to(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the parent, if any
    pub fn parent(mut self, parent_id: Option<CommentId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Override the creation time (imports and fixtures)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Build the comment
    pub fn build(self) -> Result<Comment> {
        let content = self.content.ok_or_else(|| {
            TurftapError::Validation("Comment content is required".to_string())
        })?;

        let content = content.trim();
        if content.is_empty() {
            return Err(TurftapError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        Ok(Comment {
            id: CommentId::new(),
            listing_id: self.listing_id,
            author_id: self.author_id,
            content: content.to_string(),
            parent_id: self.parent_id,
            upvotes: 0,
            downvotes: 0,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            updated_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_basic_builder() {
        let listing = ListingId::new();
        let comment = CommentBuilder::new(listing, UserId::new())
            .content("Floodlights work till 11")
            .build()
            .unwrap();

        assert_eq!(comment.content, "Floodlights work till 11");
        assert_eq!(comment.listing_id, listing);
        assert!(comment.is_root());
        assert_eq!(comment.upvotes, 0);
        assert!(comment.updated_at.is_none());
    }

    #[test]
    fn test_reply_builder() {
        let parent = CommentId::new();
        let comment = CommentBuilder::new(ListingId::new(), UserId::new())
            .content("Agreed")
            .reply_to(parent)
            .build()
            .unwrap();

        assert_eq!(comment.parent_id, Some(parent));
    }

    #[test]
    fn test_builder_with_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        let comment = CommentBuilder::new(ListingId::new(), UserId::new())
            .content("Old one")
            .created_at(at)
            .build()
            .unwrap();

        assert_eq!(comment.created_at, at);
    }

    #[test]
    fn test_builder_trims_content() {
        let comment = CommentBuilder::new(ListingId::new(), UserId::new())
            .content("  padded  ")
            .build()
            .unwrap();

        assert_eq!(comment.content, "padded");
    }

    #[test]
    fn test_builder_without_content_fails() {
        let result = CommentBuilder::new(ListingId::new(), UserId::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_empty_content_fails() {
        let result = CommentBuilder::new(ListingId::new(), UserId::new())
            .content("   ")
            .build();
        assert!(result.is_err());
    }
}
