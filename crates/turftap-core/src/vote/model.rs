//! Vote data models

use crate::error::{Result, TurftapError};
use crate::types::{ListingId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    pub fn opposite(&self) -> Self {
        match self {
            VoteKind::Up => VoteKind::Down,
            VoteKind::Down => VoteKind::Up,
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteKind::Up => write!(f, "up"),
            VoteKind::Down => write!(f, "down"),
        }
    }
}

impl FromStr for VoteKind {
    type Err = TurftapError;

    /// Accepts `up`/`upvote` and `down`/`downvote`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "upvote" => Ok(VoteKind::Up),
            "down" | "downvote" => Ok(VoteKind::Down),
            other => Err(TurftapError::Validation(format!(
                "Unsupported vote type: {}",
                other
            ))),
        }
    }
}

/// One ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: UserId,
    pub listing_id: ListingId,
    pub vote_kind: VoteKind,
}

/// What a cast did to the voter's ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChange {
    /// First vote on the listing
    Added,
    /// Same kind cast again, vote withdrawn
    Removed,
    /// Direction flipped
    Switched,
}

impl fmt::Display for VoteChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteChange::Added => write!(f, "Vote added"),
            VoteChange::Removed => write!(f, "Vote removed"),
            VoteChange::Switched => write!(f, "Vote updated"),
        }
    }
}

/// Result of a cast, enough to render vote buttons without another read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub listing_id: ListingId,
    /// The voter's vote after the cast, `None` when withdrawn
    pub user_vote: Option<VoteKind>,
    pub change: VoteChange,
    pub upvotes: u64,
    pub downvotes: u64,
}

/// Ledger recount for one listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub upvotes: u64,
    pub downvotes: u64,
}

/// Loosely-typed cast request as it arrives from a handler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CastVoteRequest {
    pub listing_id: Option<String>,
    pub vote_type: Option<String>,
}

impl CastVoteRequest {
    /// Validate into typed values
    pub fn parse(&self) -> Result<(ListingId, VoteKind)> {
        let listing_id: ListingId = self
            .listing_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TurftapError::Validation("listingId is required".to_string()))?
            .parse()?;
        let kind: VoteKind = self
            .vote_type
            .as_deref()
            .ok_or_else(|| TurftapError::Validation("voteType is required".to_string()))?
            .parse()?;
        Ok((listing_id, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_kind_parse() {
        assert_eq!("up".parse::<VoteKind>().unwrap(), VoteKind::Up);
        assert_eq!("Downvote".parse::<VoteKind>().unwrap(), VoteKind::Down);
        assert!("sideways".parse::<VoteKind>().is_err());
        assert_eq!(VoteKind::Up.opposite(), VoteKind::Down);
    }

    #[test]
    fn test_cast_request_parse() {
        let listing = ListingId::new();
        let request = CastVoteRequest {
            listing_id: Some(listing.to_string()),
            vote_type: Some("upvote".to_string()),
        };
        assert_eq!(request.parse().unwrap(), (listing, VoteKind::Up));
    }

    #[test]
    fn test_cast_request_rejects_bad_input() {
        let missing = CastVoteRequest {
            listing_id: None,
            vote_type: Some("up".to_string()),
        };
        assert!(matches!(missing.parse(), Err(TurftapError::Validation(_))));

        let bad_kind = CastVoteRequest {
            listing_id: Some(ListingId::new().to_string()),
            vote_type: Some("meh".to_string()),
        };
        assert!(matches!(bad_kind.parse(), Err(TurftapError::Validation(_))));

        let bad_id = CastVoteRequest {
            listing_id: Some("123".to_string()),
            vote_type: Some("up".to_string()),
        };
        assert!(matches!(bad_id.parse(), Err(TurftapError::Validation(_))));
    }

    #[test]
    fn test_request_from_json() {
        let json = r#"{"listingId": null, "voteType": "down"}"#;
        let request: CastVoteRequest = serde_json::from_str(json).unwrap();
        assert!(request.parse().is_err());
    }
}
