//! Parent/child index over one listing's comments
//!
//! Comments are stored flat. The index is built once per read in O(n) and
//! every walk over it uses an explicit stack, so thread depth never turns
//! into call-stack depth. A visited set guards against parent cycles in
//! corrupted data.

use super::model::{newest_first, Comment, CommentNode, CommentView};
use crate::types::CommentId;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Parent to children index
#[derive(Debug, Clone, Default)]
pub struct ThreadIndex {
    comments: HashMap<CommentId, Comment>,
    /// Children per parent, newest first
    children: HashMap<CommentId, Vec<CommentId>>,
    /// Comments without a parent, newest first
    roots: Vec<CommentId>,
}

impl ThreadIndex {
    /// Index a set of comments
    pub fn build(comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut sorted: Vec<Comment> = comments.into_iter().collect();
        sorted.sort_by(newest_first);

        let mut index = Self::default();
        for comment in sorted {
            match comment.parent_id {
                None => index.roots.push(comment.id),
                Some(parent) => index.children.entry(parent).or_default().push(comment.id),
            }
            index.comments.insert(comment.id, comment);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn roots(&self) -> &[CommentId] {
        &self.roots
    }

    /// Direct replies to `id`, newest first
    pub fn children(&self, id: &CommentId) -> &[CommentId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All transitive replies to `id`, excluding `id` itself
    pub fn descendants(&self, id: &CommentId) -> Vec<CommentId> {
        let mut visited = HashSet::from([*id]);
        let mut found = Vec::new();
        let mut stack: Vec<CommentId> = self.children(id).to_vec();

        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                warn!("Comment {} reached twice below {}, parent cycle", next, id);
                continue;
            }
            found.push(next);
            stack.extend(self.children(&next).iter().copied());
        }
        found
    }

    /// Assemble the reply forest.
    ///
    /// Comments whose parent is missing, or that sit on a parent cycle, are
    /// left out and logged.
    pub fn into_forest(
        mut self,
        mut view: impl FnMut(Comment) -> CommentView,
    ) -> Vec<CommentNode> {
        // Preorder walk from the roots; every parent precedes its replies.
        let mut order = Vec::with_capacity(self.comments.len());
        let mut visited = HashSet::new();
        let mut stack: Vec<CommentId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.children(&id).iter().rev().copied());
        }

        let unattached = self.comments.len() - order.len();
        if unattached > 0 {
            warn!("{} comments are not attached to any root thread", unattached);
        }

        // Build bottom-up so each node's replies are complete when it is built.
        let mut built: HashMap<CommentId, CommentNode> = HashMap::with_capacity(order.len());
        for id in order.iter().rev() {
            let Some(comment) = self.comments.remove(id) else {
                continue;
            };
            let replies: Vec<CommentNode> = self
                .children
                .get(id)
                .map(|kids| kids.iter().filter_map(|kid| built.remove(kid)).collect())
                .unwrap_or_default();
            built.insert(
                *id,
                CommentNode {
                    view: view(comment),
                    replies,
                },
            );
        }

        self.roots
            .iter()
            .filter_map(|id| built.remove(id))
            .collect()
    }
}
