/// In-memory store.
///
/// All state sits behind one `RwLock`, so every composite write is applied
/// under a single write guard and readers never observe a half-registered
/// user. Cloning shares the same underlying data.
///
/// Uniqueness mirrors the Postgres schema: emails are unique ignoring case,
/// external ids are unique, and a membership pair exists at most once.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{IdentityStore, MembershipStore, StoreError, UserStore};
use crate::models::membership::Membership;
use crate::models::organization::{NewOrganization, Organization};
use crate::models::user::{NewUser, User};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    organizations: Vec<Organization>,
    memberships: Vec<Membership>,
}

impl State {
    fn user_by_id(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn organization_by_id(&self, id: Uuid) -> Option<&Organization> {
        self.organizations.iter().find(|o| o.id == id)
    }

    fn is_member(&self, user_id: Uuid, organization_id: Uuid) -> bool {
        self.memberships
            .iter()
            .any(|m| m.user_id == user_id && m.organization_id == organization_id)
    }

    fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.to_lowercase();
        self.users.iter().find(|u| u.email.to_lowercase() == email)
    }

    fn check_new_organization(&self, org: &NewOrganization) -> Result<(), StoreError> {
        if self.organizations.iter().any(|o| o.org_id == org.org_id || o.id == org.id) {
            return Err(StoreError::Conflict("organizations_org_id_key".to_string()));
        }
        Ok(())
    }

    /// Inserts a membership, enforcing the foreign keys and primary key
    fn attach(&mut self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError> {
        if self.user_by_id(user_id).is_none() || self.organization_by_id(organization_id).is_none()
        {
            return Err(StoreError::Conflict("user_organizations foreign key".to_string()));
        }
        if self.is_member(user_id, organization_id) {
            return Ok(false);
        }
        self.memberships.push(Membership {
            user_id,
            organization_id,
            created_at: Utc::now(),
        });
        Ok(true)
    }
}

/// Store keeping everything in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of stored users
    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }

    /// Number of stored organizations
    pub fn organization_count(&self) -> usize {
        self.read().organizations.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read().user_by_id(id).cloned())
    }

    async fn find_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().user_by_email(email).cloned())
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn attach(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError> {
        self.write().attach(user_id, organization_id)
    }

    async fn is_member(&self, user_id: Uuid, organization_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.read().is_member(user_id, organization_id))
    }

    async fn organizations_for(&self, user_id: Uuid) -> Result<Vec<Organization>, StoreError> {
        let state = self.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| state.organization_by_id(m.organization_id).cloned())
            .collect())
    }

    async fn find_organization_for_member(
        &self,
        member_id: Uuid,
        org_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let state = self.read();
        Ok(state
            .organizations
            .iter()
            .find(|o| o.org_id == org_id && state.is_member(member_id, o.id))
            .cloned())
    }

    async fn members_of(&self, organization_id: Uuid) -> Result<Vec<User>, StoreError> {
        let state = self.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .filter_map(|m| state.user_by_id(m.user_id).cloned())
            .collect())
    }

    async fn share_organization(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, StoreError> {
        let state = self.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.user_id == user_a)
            .any(|m| state.is_member(user_b, m.organization_id)))
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn register(
        &self,
        user: NewUser,
        organization: NewOrganization,
    ) -> Result<(User, Organization), StoreError> {
        let mut state = self.write();

        if state.user_by_email(&user.email).is_some() {
            return Err(StoreError::DuplicateEmail);
        }
        if state
            .users
            .iter()
            .any(|u| u.user_id == user.user_id || u.id == user.id)
        {
            return Err(StoreError::Conflict("users_user_id_key".to_string()));
        }
        state.check_new_organization(&organization)?;

        let now = Utc::now();
        let user = User::from_new(user, now);
        let organization = Organization::from_new(organization, now);

        state.users.push(user.clone());
        state.organizations.push(organization.clone());
        state.attach(user.id, organization.id)?;

        Ok((user, organization))
    }

    async fn create_organization(
        &self,
        creator_id: Uuid,
        organization: NewOrganization,
    ) -> Result<Organization, StoreError> {
        let mut state = self.write();

        if state.user_by_id(creator_id).is_none() {
            return Err(StoreError::Conflict("user_organizations foreign key".to_string()));
        }
        state.check_new_organization(&organization)?;

        let organization = Organization::from_new(organization, Utc::now());
        state.organizations.push(organization.clone());
        state.attach(creator_id, organization.id)?;

        Ok(organization)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
