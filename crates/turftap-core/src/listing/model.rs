//! Listing data models

use crate::error::{Result, TurftapError};
use crate::types::{ListingId, UserId};
use crate::vote::VoteKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A submitted sports ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    /// Sports played at the ground
    pub categories: Vec<String>,
    pub location: Location,
    pub timings: String,
    pub is_paid: bool,
    /// Always 0 for free grounds
    #[serde(default)]
    pub price: u64,
    pub images: Vec<String>,
    pub submitted_by: UserId,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Counter for one vote kind
    pub fn count(&self, kind: VoteKind) -> u64 {
        match kind {
            VoteKind::Up => self.upvotes,
            VoteKind::Down => self.downvotes,
        }
    }

    /// Add one vote of `kind` to the aggregate counters
    pub fn increment(&mut self, kind: VoteKind) {
        match kind {
            VoteKind::Up => self.upvotes += 1,
            VoteKind::Down => self.downvotes += 1,
        }
    }

    /// Remove one vote of `kind` from the aggregate counters.
    ///
    /// Fails instead of wrapping when the counter is already zero: that can
    /// only happen if the counters drifted from the vote ledger.
    pub fn decrement(&mut self, kind: VoteKind) -> Result<()> {
        let counter = match kind {
            VoteKind::Up => &mut self.upvotes,
            VoteKind::Down => &mut self.downvotes,
        };
        *counter = counter.checked_sub(1).ok_or_else(|| {
            TurftapError::Store(format!(
                "{} counter of listing {} would become negative",
                kind, self.id
            ))
        })?;
        Ok(())
    }

    pub fn is_approved(&self) -> bool {
        self.status == ListingStatus::Approved
    }
}

/// Where a ground is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub state: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

/// Moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingStatus::Pending => write!(f, "pending"),
            ListingStatus::Approved => write!(f, "approved"),
            ListingStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A distinct city/state pair with approved listings
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityState {
    pub city: String,
    pub state: String,
}

/// What went away with a deleted listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRemoval {
    pub listing_id: ListingId,
    pub votes_removed: usize,
    pub comments_removed: usize,
}

/// Browse ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    New,
    /// Most upvoted first
    Top,
}

impl FromStr for SortOrder {
    type Err = TurftapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "new" => Ok(SortOrder::New),
            "top" => Ok(SortOrder::Top),
            other => Err(TurftapError::Validation(format!(
                "Unknown sort order: {}",
                other
            ))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut listing = fixtures::listing("Lake Arena", UserId::new());
        listing.increment(VoteKind::Up);
        listing.increment(VoteKind::Down);
        listing.increment(VoteKind::Up);
        assert_eq!(listing.count(VoteKind::Up), 2);
        assert_eq!(listing.count(VoteKind::Down), 1);

        listing.decrement(VoteKind::Down).unwrap();
        assert_eq!(listing.downvotes, 0);
    }

    #[test]
    fn test_decrement_never_goes_negative() {
        let mut listing = fixtures::listing("Lake Arena", UserId::new());
        let err = listing.decrement(VoteKind::Up).unwrap_err();
        assert!(matches!(err, TurftapError::Store(_)));
        assert_eq!(listing.upvotes, 0);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("top".parse::<SortOrder>().unwrap(), SortOrder::Top);
        assert_eq!("NEW".parse::<SortOrder>().unwrap(), SortOrder::New);
        assert!("hot".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ListingStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
