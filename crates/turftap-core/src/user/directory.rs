//! User directory operations

use super::model::{ContributorSummary, SignInRequest, User};
use crate::config::ContributorConfig;
use crate::error::{Result, TurftapError};
use crate::store::{Store, StoreExt};
use crate::types::{require_admin, Identity, Page, Role, UserId};
use std::sync::Arc;
use tracing::{debug, info};

/// Users, roles and contribution points
pub struct UserDirectory {
    store: Arc<dyn Store>,
    config: ContributorConfig,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn Store>, config: ContributorConfig) -> Self {
        Self { store, config }
    }

    /// Return the user for this email, creating a member on first sign-in
    pub fn sign_in(&self, request: SignInRequest) -> Result<User> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        if name.is_empty() {
            return Err(TurftapError::Validation("Name is required".to_string()));
        }
        if !is_plausible_email(&email) {
            return Err(TurftapError::Validation(format!(
                "Invalid email address: {}",
                request.email
            )));
        }

        self.store.write(|data| {
            if let Some(existing) = data.users.values().find(|u| u.has_email(&email)) {
                debug!("Existing user {} signed in", existing.id);
                return Ok(existing.clone());
            }

            let mut user = User::new(name, email);
            user.profile_image = request.profile_image.filter(|i| !i.trim().is_empty());
            info!("Registered user {}", user.id);
            data.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    pub fn get(&self, id: &UserId) -> Result<User> {
        self.store.read(|data| data.user(id).cloned())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.store
            .read(|data| Ok(data.users.values().find(|u| u.has_email(email)).cloned()))
    }

    /// Resolve the identity a known user acts with
    pub fn identity_of(&self, id: &UserId) -> Result<Identity> {
        self.store.read(|data| Ok(data.user(id)?.identity()))
    }

    /// Grant or revoke the admin role
    pub fn set_role(&self, identity: Option<&Identity>, id: &UserId, role: Role) -> Result<User> {
        let admin = require_admin(identity)?;
        let user = self.store.write(|data| {
            let user = data.user_mut(id)?;
            user.role = role;
            Ok(user.clone())
        })?;
        info!("User {} set role of {} to {}", admin.user_id, id, role);
        Ok(user)
    }

    /// Make `id` the first admin. Refused once any admin exists.
    pub fn bootstrap_admin(&self, id: &UserId) -> Result<User> {
        let user = self.store.write(|data| {
            if data.users.values().any(|u| u.role.is_privileged()) {
                return Err(TurftapError::Forbidden(
                    "an admin already exists; ask them to grant the role".to_string(),
                ));
            }
            let user = data.user_mut(id)?;
            user.role = Role::Admin;
            Ok(user.clone())
        })?;
        info!("User {} bootstrapped as admin", id);
        Ok(user)
    }

    /// Users ranked by points, highest first
    pub fn top_contributors(&self, page: usize, limit: Option<usize>) -> Result<Page<ContributorSummary>> {
        let limit = limit.unwrap_or(self.config.default_page_size);
        if page < 1 || limit < 1 || limit > self.config.max_page_size {
            return Err(TurftapError::Validation(format!(
                "Invalid pagination parameters: page must be >= 1 and limit between 1 and {}",
                self.config.max_page_size
            )));
        }

        let mut ranked: Vec<ContributorSummary> = self
            .store
            .read(|data| Ok(data.users.values().map(ContributorSummary::from).collect()))?;
        ranked.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));

        Ok(Page::paginate(ranked, page, limit))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
