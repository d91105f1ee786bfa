//! Listed sports grounds
//!
//! Grounds are submitted by users, reviewed by admins and only browsable once
//! approved. Vote counters live on the listing and are owned by the vote
//! ledger.

mod model;
mod query;
mod service;
mod validator;

pub use model::{CityState, Listing, ListingRemoval, ListingStatus, Location, SortOrder};
pub use query::ListingQuery;
pub use service::ListingService;
pub use validator::{
    validate_submission, SubmitListingRequest, UpdateListingRequest, ValidSubmission,
};

#[cfg(test)]
pub(crate) use model::fixtures;
