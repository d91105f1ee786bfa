//! turftap-storage - Storage library for turftap
//!
//! This crate provides the JSON file backend for the turftap store.

mod data_store;

pub use data_store::FileSystemStorage;
