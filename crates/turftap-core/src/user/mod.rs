//! Users and contribution ranking

mod directory;
mod model;

pub use directory::UserDirectory;
pub use model::{AuthorSummary, ContributorSummary, SignInRequest, User};
