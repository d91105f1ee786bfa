//! turftap-core - Core library for turftap
//!
//! This crate provides the business logic behind turftap, a directory of
//! sports grounds: listing submission and moderation, one-vote-per-user
//! voting with aggregate counters, threaded comments and contributor points.
//! Everything goes through a transactional [`store::Store`].

pub mod app;
pub mod comment;
pub mod config;
pub mod error;
pub mod listing;
pub mod store;
pub mod types;
pub mod user;
pub mod vote;

pub use app::Turftap;
pub use error::{ErrorKind, Result, TurftapError};
pub use types::*;
