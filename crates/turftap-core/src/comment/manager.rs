//! Comment manager for thread operations

use super::builder::CommentBuilder;
use super::index::ThreadIndex;
use super::model::{
    AddCommentRequest, Comment, CommentNode, CommentView, DeleteOutcome, EditCommentRequest,
};
use super::validator::CommentValidator;
use crate::config::CommentConfig;
use crate::error::{Result, TurftapError};
use crate::store::{Dataset, Store, StoreExt};
use crate::types::{require_identity, CommentId, Identity, ListingId};
use std::sync::Arc;
use tracing::{debug, info};

/// Threaded comments on listings
pub struct CommentManager {
    store: Arc<dyn Store>,
    validator: CommentValidator,
}

impl CommentManager {
    pub fn new(store: Arc<dyn Store>, config: CommentConfig) -> Self {
        Self {
            store,
            validator: CommentValidator::with_max_length(config.max_length),
        }
    }

    /// Post a root comment or a reply
    pub fn add(
        &self,
        identity: Option<&Identity>,
        listing_id: ListingId,
        content: &str,
        parent_id: Option<CommentId>,
    ) -> Result<CommentView> {
        let author = require_identity(identity)?.user_id;
        let content = self.validator.validate_content(content)?;

        let comment = CommentBuilder::new(listing_id, author)
            .content(content)
            .parent(parent_id)
            .build()?;

        let view = self.store.write(|data| {
            data.listing(&listing_id)?;
            if let Some(parent_id) = parent_id {
                let parent = data
                    .comments
                    .get(&parent_id)
                    .ok_or_else(|| TurftapError::ParentCommentNotFound(parent_id.to_string()))?;
                if parent.listing_id != listing_id {
                    return Err(TurftapError::Validation(format!(
                        "Parent comment {} belongs to another listing",
                        parent_id
                    )));
                }
            }
            data.comments.insert(comment.id, comment.clone());
            Ok(resolve(data, comment.clone()))
        })?;

        info!(
            "Comment {} added to {} by {}",
            view.comment.id, listing_id, author
        );
        Ok(view)
    }

    /// Validate a raw request and post it
    pub fn add_request(
        &self,
        identity: Option<&Identity>,
        request: &AddCommentRequest,
    ) -> Result<CommentView> {
        require_identity(identity)?;
        let new = request.parse()?;
        self.add(identity, new.listing_id, &new.content, new.parent_id)
    }

    /// Replace the content of one's own comment
    pub fn edit(
        &self,
        identity: Option<&Identity>,
        comment_id: &CommentId,
        content: &str,
    ) -> Result<CommentView> {
        let editor = require_identity(identity)?.user_id;
        let content = self.validator.validate_content(content)?;

        let view = self.store.write(|data| {
            let comment = data.comment_mut(comment_id)?;
            if comment.author_id != editor {
                return Err(TurftapError::Forbidden(
                    "only the author can edit a comment".to_string(),
                ));
            }
            comment.update_content(content);
            let comment = comment.clone();
            Ok(resolve(data, comment))
        })?;

        info!("Comment {} edited by {}", comment_id, editor);
        Ok(view)
    }

    /// Validate a raw edit request and apply it
    pub fn edit_request(
        &self,
        identity: Option<&Identity>,
        request: &EditCommentRequest,
    ) -> Result<CommentView> {
        require_identity(identity)?;
        let (id, content) = request.parse()?;
        self.edit(identity, &id, &content)
    }

    /// Delete a comment and every reply beneath it.
    ///
    /// Allowed for the author and for admins.
    pub fn delete(
        &self,
        identity: Option<&Identity>,
        comment_id: &CommentId,
    ) -> Result<DeleteOutcome> {
        let caller = *require_identity(identity)?;

        let deleted_count = self.store.write(|data| {
            let target = data.comment(comment_id)?;
            if target.author_id != caller.user_id && !caller.is_privileged() {
                return Err(TurftapError::Forbidden(
                    "only the author or an admin can delete a comment".to_string(),
                ));
            }

            // Index the whole collection so replies filed under another
            // listing by corrupted data are still swept up.
            let index = ThreadIndex::build(data.comments.values().cloned());
            let mut doomed = index.descendants(comment_id);
            doomed.push(*comment_id);

            for id in &doomed {
                data.comments.remove(id);
            }
            Ok(doomed.len())
        })?;

        info!(
            "Comment {} deleted by {} ({} removed)",
            comment_id, caller.user_id, deleted_count
        );
        Ok(DeleteOutcome { deleted_count })
    }

    /// The reply forest for a listing, newest threads first
    pub fn tree(&self, listing_id: &ListingId) -> Result<Vec<CommentNode>> {
        self.store.read(|data| {
            let index = ThreadIndex::build(data.comments_for(listing_id).cloned());
            debug!("Building tree of {} comments for {}", index.len(), listing_id);
            Ok(index.into_forest(|comment| resolve(data, comment)))
        })
    }

    /// One comment with its author resolved
    pub fn get(&self, comment_id: &CommentId) -> Result<CommentView> {
        self.store
            .read(|data| Ok(resolve(data, data.comment(comment_id)?.clone())))
    }

    pub fn count_for_listing(&self, listing_id: &ListingId) -> Result<usize> {
        self.store
            .read(|data| Ok(data.comments_for(listing_id).count()))
    }
}

/// Attach the author's display fields
fn resolve(data: &Dataset, comment: Comment) -> CommentView {
    let author = data.users.get(&comment.author_id).map(|u| u.author_summary());
    CommentView { comment, author }
}
