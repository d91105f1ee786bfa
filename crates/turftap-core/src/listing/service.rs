//! Listing submission, moderation and browsing

use super::model::{CityState, Listing, ListingRemoval, ListingStatus};
use super::query::ListingQuery;
use super::validator::{validate_submission, SubmitListingRequest, UpdateListingRequest};
use crate::config::ListingConfig;
use crate::error::{Result, TurftapError};
use crate::store::{Store, StoreExt};
use crate::types::{require_admin, require_identity, Identity, ListingId, Page, UserId};
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// The grounds collection
pub struct ListingService {
    store: Arc<dyn Store>,
    config: ListingConfig,
}

impl ListingService {
    pub fn new(store: Arc<dyn Store>, config: ListingConfig) -> Self {
        Self { store, config }
    }

    /// Submit a ground for review
    pub fn submit(&self, identity: Option<&Identity>, request: SubmitListingRequest) -> Result<Listing> {
        let identity = require_identity(identity)?;
        let valid = validate_submission(request)?;

        let listing = Listing {
            id: ListingId::new(),
            title: valid.title,
            description: valid.description,
            categories: valid.categories,
            location: valid.location,
            timings: valid.timings,
            is_paid: valid.is_paid,
            price: valid.price,
            images: valid.images,
            submitted_by: identity.user_id,
            status: ListingStatus::Pending,
            remarks: None,
            upvotes: 0,
            downvotes: 0,
            created_at: Utc::now(),
        };

        self.store.write(|data| {
            data.listings.insert(listing.id, listing.clone());
            Ok(())
        })?;

        info!("Listing {} submitted by {}", listing.id, identity.user_id);
        Ok(listing)
    }

    pub fn get(&self, id: &ListingId) -> Result<Listing> {
        self.store.read(|data| data.listing(id).cloned())
    }

    /// Approved listings matching `query`
    pub fn browse(&self, query: &ListingQuery) -> Result<Page<Listing>> {
        if query.page < 1 {
            return Err(TurftapError::Validation(
                "Page must be 1 or greater".to_string(),
            ));
        }

        let mut matching: Vec<Listing> = self.store.read(|data| {
            Ok(data
                .listings
                .values()
                .filter(|l| l.is_approved() && query.matches(l))
                .cloned()
                .collect())
        })?;
        matching.sort_by(|a, b| query.compare(a, b));

        debug!("Browse matched {} listings", matching.len());
        Ok(Page::paginate(matching, query.page, self.config.page_size))
    }

    /// Approve a pending or rejected listing and reward the submitter
    pub fn approve(&self, identity: Option<&Identity>, id: &ListingId) -> Result<Listing> {
        let admin = require_admin(identity)?;
        let points = self.config.approval_points;

        let listing = self.store.write(|data| {
            let listing = data.listing_mut(id)?;
            if listing.is_approved() {
                return Err(TurftapError::Validation(format!(
                    "Listing {} is already approved",
                    id
                )));
            }
            listing.status = ListingStatus::Approved;
            listing.remarks = None;
            let listing = listing.clone();

            // The submitter may have been removed from the directory.
            if let Some(user) = data.users.get_mut(&listing.submitted_by) {
                user.points += points;
            }
            Ok(listing)
        })?;

        info!(
            "Listing {} approved by {}, {} points to {}",
            id, admin.user_id, points, listing.submitted_by
        );
        Ok(listing)
    }

    /// Reject a listing with optional remarks for the submitter
    pub fn reject(
        &self,
        identity: Option<&Identity>,
        id: &ListingId,
        remarks: Option<String>,
    ) -> Result<Listing> {
        let admin = require_admin(identity)?;
        let remarks = remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

        let listing = self.store.write(|data| {
            let listing = data.listing_mut(id)?;
            listing.status = ListingStatus::Rejected;
            listing.remarks = remarks;
            Ok(listing.clone())
        })?;

        info!("Listing {} rejected by {}", id, admin.user_id);
        Ok(listing)
    }

    /// Edit a listing's details (admin only).
    ///
    /// The merged result must pass the same checks as a new submission.
    /// Status, counters and the submitter are left alone.
    pub fn update(
        &self,
        identity: Option<&Identity>,
        id: &ListingId,
        request: UpdateListingRequest,
    ) -> Result<Listing> {
        let admin = require_admin(identity)?;
        if request.is_empty() {
            return Err(TurftapError::Validation("Nothing to update".to_string()));
        }

        let listing = self.store.write(|data| {
            let listing = data.listing_mut(id)?;
            let valid = validate_submission(request.merge(listing))?;

            listing.title = valid.title;
            listing.description = valid.description;
            listing.categories = valid.categories;
            listing.location = valid.location;
            listing.timings = valid.timings;
            listing.is_paid = valid.is_paid;
            listing.price = valid.price;
            listing.images = valid.images;
            Ok(listing.clone())
        })?;

        info!("Listing {} updated by {}", id, admin.user_id);
        Ok(listing)
    }

    /// Delete a listing with its votes and comments (admin only)
    pub fn delete(&self, identity: Option<&Identity>, id: &ListingId) -> Result<ListingRemoval> {
        let admin = require_admin(identity)?;

        let removal = self.store.write(|data| {
            data.listings
                .remove(id)
                .ok_or_else(|| TurftapError::ListingNotFound(id.to_string()))?;

            let mut votes_removed = 0;
            data.votes.retain(|_, by_listing| {
                if by_listing.remove(id).is_some() {
                    votes_removed += 1;
                }
                !by_listing.is_empty()
            });

            let before = data.comments.len();
            data.comments.retain(|_, c| &c.listing_id != id);

            Ok(ListingRemoval {
                listing_id: *id,
                votes_removed,
                comments_removed: before - data.comments.len(),
            })
        })?;

        info!(
            "Listing {} deleted by {} ({} votes, {} comments)",
            id, admin.user_id, removal.votes_removed, removal.comments_removed
        );
        Ok(removal)
    }

    /// Review queue, oldest first
    pub fn pending(&self, identity: Option<&Identity>) -> Result<Vec<Listing>> {
        require_admin(identity)?;
        let mut pending: Vec<Listing> = self.store.read(|data| {
            Ok(data
                .listings
                .values()
                .filter(|l| l.status == ListingStatus::Pending)
                .cloned()
                .collect())
        })?;
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    /// Everything a user has submitted, newest first
    pub fn submitted_by(&self, user: &UserId) -> Result<Vec<Listing>> {
        let mut listings: Vec<Listing> = self.store.read(|data| {
            Ok(data
                .listings
                .values()
                .filter(|l| &l.submitted_by == user)
                .cloned()
                .collect())
        })?;
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    /// Distinct city/state pairs among approved listings
    pub fn locations(&self) -> Result<Vec<CityState>> {
        self.store.read(|data| {
            let set: BTreeSet<CityState> = data
                .listings
                .values()
                .filter(|l| l.is_approved())
                .map(|l| CityState {
                    city: l.location.city.clone(),
                    state: l.location.state.clone(),
                })
                .collect();
            Ok(set.into_iter().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentManager;
    use crate::config::CommentConfig;
    use crate::listing::validator::sample_request;
    use crate::store::MemoryStore;
    use crate::vote::{VoteKind, VoteLedger};
    use crate::user::User;
    use pretty_assertions::assert_eq;

    struct Fixture {
        service: ListingService,
        store: Arc<MemoryStore>,
        submitter: User,
        admin: Identity,
    }

    fn fixture() -> Fixture {
        let submitter = User::new("Sam", "sam@example.com");
        let store = Arc::new(MemoryStore::new());
        store
            .write(|data| {
                data.users.insert(submitter.id, submitter.clone());
                Ok(())
            })
            .unwrap();
        Fixture {
            service: ListingService::new(store.clone(), ListingConfig::default()),
            store,
            submitter,
            admin: Identity::admin(UserId::new()),
        }
    }

    #[test]
    fn test_submit_creates_pending_listing() {
        let f = fixture();
        let listing = f
            .service
            .submit(Some(&f.submitter.identity()), sample_request())
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.submitted_by, f.submitter.id);
        assert_eq!(f.service.get(&listing.id).unwrap(), listing);
    }

    #[test]
    fn test_submit_requires_identity() {
        let f = fixture();
        let err = f.service.submit(None, sample_request()).unwrap_err();
        assert!(matches!(err, TurftapError::Unauthorized));
    }

    #[test]
    fn test_approve_awards_points_once() {
        let f = fixture();
        let listing = f
            .service
            .submit(Some(&f.submitter.identity()), sample_request())
            .unwrap();

        let approved = f.service.approve(Some(&f.admin), &listing.id).unwrap();
        assert!(approved.is_approved());
        assert!(f.service.approve(Some(&f.admin), &listing.id).is_err());

        let points = f
            .store
            .read(|data| Ok(data.user(&f.submitter.id)?.points))
            .unwrap();
        assert_eq!(points, 3);
    }

    #[test]
    fn test_moderation_requires_admin() {
        let f = fixture();
        let member = f.submitter.identity();
        let listing = f.service.submit(Some(&member), sample_request()).unwrap();

        assert!(matches!(
            f.service.approve(Some(&member), &listing.id),
            Err(TurftapError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.reject(None, &listing.id, None),
            Err(TurftapError::Unauthorized)
        ));
        assert!(matches!(
            f.service.approve(Some(&f.admin), &ListingId::new()),
            Err(TurftapError::ListingNotFound(_))
        ));
    }

    #[test]
    fn test_reject_records_remarks() {
        let f = fixture();
        let listing = f
            .service
            .submit(Some(&f.submitter.identity()), sample_request())
            .unwrap();

        let rejected = f
            .service
            .reject(Some(&f.admin), &listing.id, Some("Duplicate entry".to_string()))
            .unwrap();
        assert_eq!(rejected.status, ListingStatus::Rejected);
        assert_eq!(rejected.remarks.as_deref(), Some("Duplicate entry"));
        assert!(f.service.pending(Some(&f.admin)).unwrap().is_empty());
    }

    #[test]
    fn test_browse_only_shows_approved() {
        let f = fixture();
        let member = f.submitter.identity();
        let approved = f.service.submit(Some(&member), sample_request()).unwrap();
        let mut other = sample_request();
        other.city = "Mumbai".to_string();
        let pending = f.service.submit(Some(&member), other).unwrap();
        f.service.approve(Some(&f.admin), &approved.id).unwrap();

        let page = f.service.browse(&ListingQuery::default()).unwrap();
        let ids: Vec<_> = page.items.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![approved.id]);
        assert!(!ids.contains(&pending.id));

        let none = f
            .service
            .browse(&ListingQuery::default().city("mumbai"))
            .unwrap();
        assert!(none.items.is_empty());

        assert!(f.service.browse(&ListingQuery::default().page(0)).is_err());
    }

    #[test]
    fn test_locations_are_distinct() {
        let f = fixture();
        let member = f.submitter.identity();
        for _ in 0..2 {
            let listing = f.service.submit(Some(&member), sample_request()).unwrap();
            f.service.approve(Some(&f.admin), &listing.id).unwrap();
        }
        let mut elsewhere = sample_request();
        elsewhere.city = "Nagpur".to_string();
        f.service.submit(Some(&member), elsewhere).unwrap();

        let locations = f.service.locations().unwrap();
        assert_eq!(
            locations,
            vec![CityState {
                city: "Pune".to_string(),
                state: "Maharashtra".to_string()
            }]
        );
    }

    #[test]
    fn test_update_applies_partial_edit() {
        let f = fixture();
        let listing = f
            .service
            .submit(Some(&f.submitter.identity()), sample_request())
            .unwrap();
        f.service.approve(Some(&f.admin), &listing.id).unwrap();

        let updated = f
            .service
            .update(
                Some(&f.admin),
                &listing.id,
                UpdateListingRequest {
                    title: Some("Riverside Turf Arena".to_string()),
                    price: Some(1000),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Riverside Turf Arena");
        assert_eq!(updated.price, 1000);
        assert_eq!(updated.description, listing.description);
        assert_eq!(updated.status, ListingStatus::Approved);
        assert_eq!(f.service.get(&listing.id).unwrap(), updated);
    }

    #[test]
    fn test_update_rejects_invalid_edits() {
        let f = fixture();
        let listing = f
            .service
            .submit(Some(&f.submitter.identity()), sample_request())
            .unwrap();

        let invalid = [
            UpdateListingRequest {
                title: Some("   ".to_string()),
                ..Default::default()
            },
            UpdateListingRequest {
                images: Some(Vec::new()),
                ..Default::default()
            },
            UpdateListingRequest {
                is_paid: Some(true),
                price: Some(0),
                ..Default::default()
            },
            UpdateListingRequest::default(),
        ];
        for request in invalid {
            assert!(matches!(
                f.service.update(Some(&f.admin), &listing.id, request),
                Err(TurftapError::Validation(_))
            ));
        }
        assert_eq!(f.service.get(&listing.id).unwrap(), listing);

        let rename = UpdateListingRequest {
            title: Some("Mine now".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            f.service
                .update(Some(&f.submitter.identity()), &listing.id, rename.clone()),
            Err(TurftapError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.update(Some(&f.admin), &ListingId::new(), rename),
            Err(TurftapError::ListingNotFound(_))
        ));
    }

    #[test]
    fn test_delete_cascades_votes_and_comments() {
        let f = fixture();
        let member = f.submitter.identity();
        let doomed = f.service.submit(Some(&member), sample_request()).unwrap();
        let kept = f.service.submit(Some(&member), sample_request()).unwrap();
        f.service.approve(Some(&f.admin), &doomed.id).unwrap();
        f.service.approve(Some(&f.admin), &kept.id).unwrap();

        let votes = VoteLedger::new(f.store.clone());
        let comments = CommentManager::new(f.store.clone(), CommentConfig::default());
        let other = Identity::member(UserId::new());
        votes.cast(Some(&member), doomed.id, VoteKind::Up).unwrap();
        votes.cast(Some(&other), doomed.id, VoteKind::Down).unwrap();
        votes.cast(Some(&member), kept.id, VoteKind::Up).unwrap();
        let root = comments.add(Some(&member), doomed.id, "Great pitch", None).unwrap();
        comments
            .add(Some(&other), doomed.id, "Agreed", Some(root.comment.id))
            .unwrap();
        comments.add(Some(&other), kept.id, "Too pricey", None).unwrap();

        let removal = f.service.delete(Some(&f.admin), &doomed.id).unwrap();
        assert_eq!(removal.votes_removed, 2);
        assert_eq!(removal.comments_removed, 2);

        assert!(matches!(
            f.service.get(&doomed.id),
            Err(TurftapError::ListingNotFound(_))
        ));
        assert!(matches!(
            comments.get(&root.comment.id),
            Err(TurftapError::CommentNotFound(_))
        ));
        assert_eq!(votes.get_vote(Some(&member), &doomed.id).unwrap(), None);
        assert_eq!(votes.list_votes(Some(&other)).unwrap().len(), 0);
        assert_eq!(votes.list_votes(Some(&member)).unwrap().len(), 1);
        assert_eq!(comments.count_for_listing(&kept.id).unwrap(), 1);
        assert_eq!(f.service.get(&kept.id).unwrap().upvotes, 1);
    }

    #[test]
    fn test_delete_requires_admin() {
        let f = fixture();
        let member = f.submitter.identity();
        let listing = f.service.submit(Some(&member), sample_request()).unwrap();

        assert!(matches!(
            f.service.delete(Some(&member), &listing.id),
            Err(TurftapError::Forbidden(_))
        ));
        assert!(matches!(
            f.service.delete(Some(&f.admin), &ListingId::new()),
            Err(TurftapError::ListingNotFound(_))
        ));
        assert!(f.service.get(&listing.id).is_ok());
    }

    #[test]
    fn test_submitted_by() {
        let f = fixture();
        let member = f.submitter.identity();
        f.service.submit(Some(&member), sample_request()).unwrap();
        f.service.submit(Some(&member), sample_request()).unwrap();

        assert_eq!(f.service.submitted_by(&f.submitter.id).unwrap().len(), 2);
        assert!(f.service.submitted_by(&UserId::new()).unwrap().is_empty());
    }
}
