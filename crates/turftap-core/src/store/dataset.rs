//! The full persisted state

use crate::comment::Comment;
use crate::error::{Result, TurftapError};
use crate::listing::Listing;
use crate::types::{CommentId, ListingId, UserId};
use crate::user::User;
use crate::vote::VoteKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All records owned by a store.
///
/// Votes are keyed by voter and then listing, so a voter can never hold two
/// ledger rows for the same listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    #[serde(default)]
    pub listings: BTreeMap<ListingId, Listing>,
    #[serde(default)]
    pub votes: BTreeMap<UserId, BTreeMap<ListingId, VoteKind>>,
    #[serde(default)]
    pub comments: BTreeMap<CommentId, Comment>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self, id: &UserId) -> Result<&User> {
        self.users
            .get(id)
            .ok_or_else(|| TurftapError::UserNotFound(id.to_string()))
    }

    pub fn user_mut(&mut self, id: &UserId) -> Result<&mut User> {
        self.users
            .get_mut(id)
            .ok_or_else(|| TurftapError::UserNotFound(id.to_string()))
    }

    pub fn listing(&self, id: &ListingId) -> Result<&Listing> {
        self.listings
            .get(id)
            .ok_or_else(|| TurftapError::ListingNotFound(id.to_string()))
    }

    pub fn listing_mut(&mut self, id: &ListingId) -> Result<&mut Listing> {
        self.listings
            .get_mut(id)
            .ok_or_else(|| TurftapError::ListingNotFound(id.to_string()))
    }

    pub fn comment(&self, id: &CommentId) -> Result<&Comment> {
        self.comments
            .get(id)
            .ok_or_else(|| TurftapError::CommentNotFound(id.to_string()))
    }

    pub fn comment_mut(&mut self, id: &CommentId) -> Result<&mut Comment> {
        self.comments
            .get_mut(id)
            .ok_or_else(|| TurftapError::CommentNotFound(id.to_string()))
    }

    /// Current vote of `voter` on `listing`
    pub fn vote_of(&self, voter: &UserId, listing: &ListingId) -> Option<VoteKind> {
        self.votes.get(voter).and_then(|v| v.get(listing)).copied()
    }

    /// All comments attached to a listing
    pub fn comments_for<'a>(
        &'a self,
        listing: &'a ListingId,
    ) -> impl Iterator<Item = &'a Comment> + 'a {
        self.comments
            .values()
            .filter(move |c| &c.listing_id == listing)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.listings.is_empty()
            && self.votes.is_empty()
            && self.comments.is_empty()
    }
}
