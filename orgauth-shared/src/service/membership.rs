/// The user-organization membership graph.
///
/// All relationship traversal goes through [`MembershipGraph`]. Lookups by
/// external organization id exist only in member-scoped form
/// ([`MembershipGraph::find_visible`]).

use std::sync::Arc;

use crate::auth::identity::Identity;
use crate::error::ServiceError;
use crate::models::organization::Organization;
use crate::models::user::User;
use crate::store::IdentityStore;

/// Many-to-many relation between users and organizations
#[derive(Clone)]
pub struct MembershipGraph {
    store: Arc<dyn IdentityStore>,
}

impl MembershipGraph {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Adds an edge; `false` if it already existed
    pub async fn attach(&self, user: &User, organization: &Organization) -> Result<bool, ServiceError> {
        let created = self.store.attach(user.id, organization.id).await?;

        if created {
            tracing::info!(
                user_id = %user.user_id,
                org_id = %organization.org_id,
                "User attached to organization"
            );
        }

        Ok(created)
    }

    /// Organizations `member` belongs to, oldest membership first
    pub async fn list_organizations(&self, member: &Identity) -> Result<Vec<Organization>, ServiceError> {
        Ok(self.store.organizations_for(member.id).await?)
    }

    pub async fn is_member(
        &self,
        member: &Identity,
        organization: &Organization,
    ) -> Result<bool, ServiceError> {
        Ok(self.store.is_member(member.id, organization.id).await?)
    }

    /// Members of `organization`, earliest first
    pub async fn list_members(&self, organization: &Organization) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.members_of(organization.id).await?)
    }

    /// Looks an organization up by external id, as seen by `member`
    ///
    /// Returns `None` both for unknown ids and for organizations `member` does
    /// not belong to.
    pub async fn find_visible(
        &self,
        member: &Identity,
        org_id: &str,
    ) -> Result<Option<Organization>, ServiceError> {
        Ok(self
            .store
            .find_organization_for_member(member.id, org_id)
            .await?)
    }

    /// Checks whether `member` and `other` share at least one organization
    pub async fn share_organization(&self, member: &Identity, other: &User) -> Result<bool, ServiceError> {
        Ok(self.store.share_organization(member.id, other.id).await?)
    }
}
