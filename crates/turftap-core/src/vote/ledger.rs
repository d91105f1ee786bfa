//! Vote ledger
//!
//! One vote per (voter, listing). Casting runs a three-way state machine:
//!
//! | existing vote | cast | result                               |
//! |---------------|------|--------------------------------------|
//! | none          | k    | record k, counter(k) + 1             |
//! | k             | k    | remove vote, counter(k) - 1          |
//! | k             | !k   | flip to !k, counter(!k) + 1, k - 1   |
//!
//! The ledger row and the listing counters change in the same store
//! transaction.

use super::model::{CastVoteRequest, Tally, Vote, VoteChange, VoteKind, VoteOutcome};
use crate::error::Result;
use crate::store::{Dataset, Store, StoreExt};
use crate::types::{require_identity, Identity, ListingId, UserId};
use std::sync::Arc;
use tracing::{debug, info};

/// Records votes and keeps listing counters in step
pub struct VoteLedger {
    store: Arc<dyn Store>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Cast, withdraw or switch a vote
    pub fn cast(
        &self,
        identity: Option<&Identity>,
        listing_id: ListingId,
        kind: VoteKind,
    ) -> Result<VoteOutcome> {
        let voter = require_identity(identity)?.user_id;
        let outcome = self
            .store
            .write(|data| apply_vote(data, voter, listing_id, kind))?;

        info!(
            "{} by {} on {} (up {}, down {})",
            outcome.change, voter, listing_id, outcome.upvotes, outcome.downvotes
        );
        Ok(outcome)
    }

    /// Validate a raw request and cast it
    pub fn cast_request(
        &self,
        identity: Option<&Identity>,
        request: &CastVoteRequest,
    ) -> Result<VoteOutcome> {
        require_identity(identity)?;
        let (listing_id, kind) = request.parse()?;
        self.cast(identity, listing_id, kind)
    }

    /// The caller's current vote on a listing
    pub fn get_vote(
        &self,
        identity: Option<&Identity>,
        listing_id: &ListingId,
    ) -> Result<Option<VoteKind>> {
        let voter = require_identity(identity)?.user_id;
        self.store.read(|data| Ok(data.vote_of(&voter, listing_id)))
    }

    /// Every vote the caller holds
    pub fn list_votes(&self, identity: Option<&Identity>) -> Result<Vec<Vote>> {
        let voter = require_identity(identity)?.user_id;
        self.store.read(|data| {
            Ok(data
                .votes
                .get(&voter)
                .map(|votes| {
                    votes
                        .iter()
                        .map(|(listing_id, kind)| Vote {
                            voter_id: voter,
                            listing_id: *listing_id,
                            vote_kind: *kind,
                        })
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    /// Recount the ledger rows for a listing
    pub fn tally(&self, listing_id: &ListingId) -> Result<Tally> {
        self.store.read(|data| {
            data.listing(listing_id)?;
            Ok(tally_in(data, listing_id))
        })
    }
}

/// Apply one cast to `data`
fn apply_vote(
    data: &mut Dataset,
    voter: UserId,
    listing_id: ListingId,
    kind: VoteKind,
) -> Result<VoteOutcome> {
    // Existence check first so an unknown listing never touches the ledger.
    data.listing(&listing_id)?;

    let previous = data.vote_of(&voter, &listing_id);
    let (next, change) = match previous {
        None => (Some(kind), VoteChange::Added),
        Some(existing) if existing == kind => (None, VoteChange::Removed),
        Some(_) => (Some(kind), VoteChange::Switched),
    };

    let listing = data.listing_mut(&listing_id)?;
    if let Some(existing) = previous {
        listing.decrement(existing)?;
    }
    if let Some(new_kind) = next {
        listing.increment(new_kind);
    }
    let (upvotes, downvotes) = (listing.upvotes, listing.downvotes);

    match next {
        Some(new_kind) => {
            data.votes.entry(voter).or_default().insert(listing_id, new_kind);
        }
        None => {
            if let Some(votes) = data.votes.get_mut(&voter) {
                votes.remove(&listing_id);
                if votes.is_empty() {
                    data.votes.remove(&voter);
                }
            }
        }
    }

    debug!("Vote {:?} -> {:?} for {} on {}", previous, next, voter, listing_id);
    Ok(VoteOutcome {
        listing_id,
        user_vote: next,
        change,
        upvotes,
        downvotes,
    })
}

fn tally_in(data: &Dataset, listing_id: &ListingId) -> Tally {
    data.votes
        .values()
        .filter_map(|votes| votes.get(listing_id))
        .fold(Tally::default(), |mut tally, kind| {
            match kind {
                VoteKind::Up => tally.upvotes += 1,
                VoteKind::Down => tally.downvotes += 1,
            }
            tally
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TurftapError;
    use crate::listing::{fixtures, Listing};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    struct Fixture {
        ledger: VoteLedger,
        store: Arc<MemoryStore>,
        listing: ListingId,
    }

    fn fixture() -> Fixture {
        let listing = fixtures::listing("Lake Arena", UserId::new());
        let id = listing.id;
        let store = Arc::new(MemoryStore::new());
        store
            .write(|data| {
                data.listings.insert(id, listing);
                Ok(())
            })
            .unwrap();
        Fixture {
            ledger: VoteLedger::new(store.clone()),
            store,
            listing: id,
        }
    }

    impl Fixture {
        fn listing(&self) -> Listing {
            self.store
                .read(|data| data.listing(&self.listing).cloned())
                .unwrap()
        }

        fn assert_consistent(&self) {
            let listing = self.listing();
            let tally = self.ledger.tally(&self.listing).unwrap();
            assert_eq!(
                (listing.upvotes, listing.downvotes),
                (tally.upvotes, tally.downvotes)
            );
        }
    }

    #[test]
    fn test_first_vote_is_recorded() {
        let f = fixture();
        let voter = Identity::member(UserId::new());

        let outcome = f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        assert_eq!(outcome.user_vote, Some(VoteKind::Up));
        assert_eq!(outcome.change, VoteChange::Added);
        assert_eq!((outcome.upvotes, outcome.downvotes), (1, 0));
        assert_eq!(f.ledger.get_vote(Some(&voter), &f.listing).unwrap(), Some(VoteKind::Up));
        f.assert_consistent();
    }

    #[test]
    fn test_same_vote_twice_toggles_off() {
        let f = fixture();
        let voter = Identity::member(UserId::new());
        let before = f.listing().upvotes;

        f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        let outcome = f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();

        assert_eq!(outcome.user_vote, None);
        assert_eq!(outcome.change, VoteChange::Removed);
        assert_eq!(f.listing().upvotes, before);
        assert_eq!(f.ledger.get_vote(Some(&voter), &f.listing).unwrap(), None);
        assert!(f.store.snapshot().unwrap().votes.is_empty());
        f.assert_consistent();
    }

    #[test]
    fn test_switching_moves_one_vote() {
        let f = fixture();
        let voter = Identity::member(UserId::new());

        f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        let outcome = f.ledger.cast(Some(&voter), f.listing, VoteKind::Down).unwrap();

        assert_eq!(outcome.user_vote, Some(VoteKind::Down));
        assert_eq!(outcome.change, VoteChange::Switched);
        assert_eq!((outcome.upvotes, outcome.downvotes), (0, 1));
        assert_eq!(outcome.upvotes + outcome.downvotes, 1);
        f.assert_consistent();
    }

    #[test]
    fn test_scenario_up_up_down() {
        let f = fixture();
        let voter = Identity::member(UserId::new());

        let first = f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        assert_eq!(first.upvotes, 1);

        let second = f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        assert_eq!(second.upvotes, 0);
        assert_eq!(second.user_vote, None);

        let third = f.ledger.cast(Some(&voter), f.listing, VoteKind::Down).unwrap();
        assert_eq!(third.downvotes, 1);
        assert_eq!(third.user_vote, Some(VoteKind::Down));
        f.assert_consistent();
    }

    #[test]
    fn test_counters_match_ledger_after_mixed_sequence() {
        let f = fixture();
        let voters: Vec<Identity> = (0..5).map(|_| Identity::member(UserId::new())).collect();
        let script = [
            (0, VoteKind::Up),
            (1, VoteKind::Down),
            (2, VoteKind::Up),
            (0, VoteKind::Down),
            (1, VoteKind::Down),
            (3, VoteKind::Up),
            (2, VoteKind::Up),
            (4, VoteKind::Down),
            (3, VoteKind::Down),
            (0, VoteKind::Down),
            (4, VoteKind::Up),
        ];

        let mut previous_sum = 0i64;
        for (who, kind) in script {
            let outcome = f.ledger.cast(Some(&voters[who]), f.listing, kind).unwrap();
            let sum = (outcome.upvotes + outcome.downvotes) as i64;
            assert!((sum - previous_sum).abs() <= 1);
            previous_sum = sum;
            f.assert_consistent();
        }

        let listing = f.listing();
        assert_eq!((listing.upvotes, listing.downvotes), (1, 1));
    }

    #[test]
    fn test_votes_from_different_voters_accumulate_concurrently() {
        use std::thread;

        let f = fixture();
        let ledger = Arc::new(f.ledger);
        let listing = f.listing;

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let voter = Identity::member(UserId::new());
                    let kind = if i % 4 == 0 { VoteKind::Down } else { VoteKind::Up };
                    ledger.cast(Some(&voter), listing, kind).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = f.store.read(|data| data.listing(&listing).cloned()).unwrap();
        assert_eq!((stored.upvotes, stored.downvotes), (12, 4));
        assert_eq!(
            ledger.tally(&listing).unwrap(),
            Tally {
                upvotes: 12,
                downvotes: 4
            }
        );
    }

    #[test]
    fn test_list_votes() {
        let f = fixture();
        let other = fixtures::listing("Hill Court", UserId::new());
        let other_id = other.id;
        f.store
            .write(|data| {
                data.listings.insert(other_id, other);
                Ok(())
            })
            .unwrap();
        let voter = Identity::member(UserId::new());

        f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();
        f.ledger.cast(Some(&voter), other_id, VoteKind::Down).unwrap();

        let mut votes = f.ledger.list_votes(Some(&voter)).unwrap();
        votes.sort_by_key(|v| v.listing_id);
        assert_eq!(votes.len(), 2);
        assert!(votes.iter().all(|v| v.voter_id == voter.user_id));
        assert!(votes.contains(&Vote {
            voter_id: voter.user_id,
            listing_id: other_id,
            vote_kind: VoteKind::Down
        }));

        let json = serde_json::to_value(votes[0]).unwrap();
        assert!(json.get("voteKind").is_some());
        assert!(json.get("listingId").is_some());

        let stranger = Identity::member(UserId::new());
        assert!(f.ledger.list_votes(Some(&stranger)).unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        let f = fixture();
        let voter = Identity::member(UserId::new());

        assert!(matches!(
            f.ledger.cast(None, f.listing, VoteKind::Up),
            Err(TurftapError::Unauthorized)
        ));
        assert!(matches!(
            f.ledger.cast(Some(&voter), ListingId::new(), VoteKind::Up),
            Err(TurftapError::ListingNotFound(_))
        ));
        assert!(f.store.snapshot().unwrap().votes.is_empty());

        let request = CastVoteRequest {
            listing_id: Some(f.listing.to_string()),
            vote_type: Some("sideways".to_string()),
        };
        assert!(matches!(
            f.ledger.cast_request(Some(&voter), &request),
            Err(TurftapError::Validation(_))
        ));
        assert!(matches!(
            f.ledger.cast_request(None, &request),
            Err(TurftapError::Unauthorized)
        ));
        assert!(matches!(
            f.ledger.get_vote(None, &f.listing),
            Err(TurftapError::Unauthorized)
        ));
    }

    #[test]
    fn test_drifted_counter_rolls_back() {
        let f = fixture();
        let voter = Identity::member(UserId::new());
        f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap();

        // Simulate counters that drifted below the ledger.
        f.store
            .write(|data| {
                data.listing_mut(&f.listing)?.upvotes = 0;
                Ok(())
            })
            .unwrap();

        let err = f.ledger.cast(Some(&voter), f.listing, VoteKind::Up).unwrap_err();
        assert!(matches!(err, TurftapError::Store(_)));
        assert_eq!(
            f.ledger.get_vote(Some(&voter), &f.listing).unwrap(),
            Some(VoteKind::Up)
        );
    }
}
