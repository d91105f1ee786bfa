//! Threaded comments
//!
//! Comments are stored flat with an optional parent link. The reply forest
//! is rebuilt on read, and deleting a comment removes its whole subtree.

mod builder;
mod index;
mod manager;
mod model;
mod validator;

pub use builder::CommentBuilder;
pub use index::ThreadIndex;
pub use manager::CommentManager;
pub use model::{
    newest_first, AddCommentRequest, Comment, CommentNode, CommentView, DeleteOutcome,
    EditCommentRequest, NewComment,
};
pub use validator::{CommentValidator, MAX_COMMENT_LENGTH};
