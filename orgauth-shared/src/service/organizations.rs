/// Organization operations, always on behalf of an authenticated caller.

use std::sync::Arc;

use super::membership::MembershipGraph;
use crate::auth::authorization::require_membership;
use crate::auth::identity::Identity;
use crate::error::ServiceError;
use crate::models::organization::{NewOrganization, OrganizationView};
use crate::models::user::PublicUser;
use crate::store::IdentityStore;

/// Organization service
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn IdentityStore>,
    graph: MembershipGraph,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn IdentityStore>, graph: MembershipGraph) -> Self {
        Self { store, graph }
    }

    /// Organizations the caller belongs to
    pub async fn index(&self, caller: &Identity) -> Result<Vec<OrganizationView>, ServiceError> {
        let organizations = self.graph.list_organizations(caller).await?;
        Ok(organizations.into_iter().map(OrganizationView::from).collect())
    }

    /// A single organization, if the caller is a member
    ///
    /// # Errors
    ///
    /// `ServiceError::OrganizationNotFound` for unknown ids and for
    /// organizations the caller does not belong to
    pub async fn show(&self, caller: &Identity, org_id: &str) -> Result<OrganizationView, ServiceError> {
        let organization = require_membership(&self.graph, caller, org_id).await?;
        Ok(OrganizationView::from(organization))
    }

    /// Creates an organization with the caller as its first member
    pub async fn create(
        &self,
        caller: &Identity,
        name: String,
        description: Option<String>,
    ) -> Result<OrganizationView, ServiceError> {
        let organization = self
            .store
            .create_organization(caller.id, NewOrganization::generate(name, description))
            .await?;

        tracing::info!(
            org_id = %organization.org_id,
            creator = %caller.user_id,
            "Organization created"
        );

        Ok(OrganizationView::from(organization))
    }

    /// Adds the user `user_id` to the organization `org_id`
    ///
    /// The caller must be a member. Adding a user who is already a member
    /// succeeds without changing anything.
    ///
    /// # Returns
    ///
    /// `true` if a new membership was created
    ///
    /// # Errors
    ///
    /// - `ServiceError::OrganizationNotFound` if the caller is not a member
    /// - `ServiceError::UserNotFound` if no user has that id
    pub async fn add_member(
        &self,
        caller: &Identity,
        org_id: &str,
        user_id: &str,
    ) -> Result<bool, ServiceError> {
        let organization = require_membership(&self.graph, caller, org_id).await?;

        let user = self
            .store
            .find_user_by_user_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        self.graph.attach(&user, &organization).await
    }

    /// Members of an organization, if the caller is one of them
    pub async fn members(&self, caller: &Identity, org_id: &str) -> Result<Vec<PublicUser>, ServiceError> {
        let organization = require_membership(&self.graph, caller, org_id).await?;
        let members = self.graph.list_members(&organization).await?;
        Ok(members.into_iter().map(PublicUser::from).collect())
    }
}
