//! Listing votes

mod ledger;
mod model;

pub use ledger::VoteLedger;
pub use model::{CastVoteRequest, Tally, Vote, VoteChange, VoteKind, VoteOutcome};
