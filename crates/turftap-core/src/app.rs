//! Service bundle sharing one store handle

use crate::comment::CommentManager;
use crate::config::Config;
use crate::listing::ListingService;
use crate::store::{MemoryStore, Store};
use crate::user::UserDirectory;
use crate::vote::VoteLedger;
use std::sync::Arc;

/// Every turftap service wired to the same store
pub struct Turftap {
    store: Arc<dyn Store>,
    pub users: UserDirectory,
    pub listings: ListingService,
    pub votes: VoteLedger,
    pub comments: CommentManager,
}

impl Turftap {
    /// Wire the services to `store`
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            users: UserDirectory::new(store.clone(), config.contributors.clone()),
            listings: ListingService::new(store.clone(), config.listings.clone()),
            votes: VoteLedger::new(store.clone()),
            comments: CommentManager::new(store.clone(), config.comments.clone()),
            store,
        }
    }

    /// Services over a fresh in-memory store
    pub fn in_memory(config: &Config) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
