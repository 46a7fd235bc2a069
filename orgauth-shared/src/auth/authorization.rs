/// Membership-gated authorization checks
///
/// Access to an organization, and to its member list, requires a membership.
/// Failing checks report the target as not found, so callers cannot probe
/// which organizations or users exist.
///
/// # Example
///
/// ```no_run
/// use orgauth_shared::auth::authorization::require_membership;
/// use orgauth_shared::auth::identity::Identity;
/// use orgauth_shared::service::membership::MembershipGraph;
///
/// # async fn example(graph: MembershipGraph, caller: Identity) -> Result<(), Box<dyn std::error::Error>> {
/// let org = require_membership(&graph, &caller, "9f2c...").await?;
/// println!("{} may read {}", caller.user_id, org.name);
/// # Ok(())
/// # }
/// ```

use super::identity::Identity;
use crate::error::ServiceError;
use crate::models::organization::Organization;
use crate::models::user::User;
use crate::service::membership::MembershipGraph;

/// Resolves `org_id` for `caller`, requiring a membership
///
/// # Errors
///
/// `ServiceError::OrganizationNotFound` if the organization doesn't exist or
/// the caller is not a member
pub async fn require_membership(
    graph: &MembershipGraph,
    caller: &Identity,
    org_id: &str,
) -> Result<Organization, ServiceError> {
    match graph.find_visible(caller, org_id).await? {
        Some(org) => Ok(org),
        None => {
            tracing::debug!(
                caller = %caller.user_id,
                org_id = %org_id,
                "Organization not visible to caller"
            );
            Err(ServiceError::OrganizationNotFound)
        }
    }
}

/// Requires that `caller` may see `target`
///
/// A user is visible to themselves and to anyone they share an organization
/// with.
///
/// # Errors
///
/// `ServiceError::UserNotFound` otherwise
pub async fn require_user_visible(
    graph: &MembershipGraph,
    caller: &Identity,
    target: &User,
) -> Result<(), ServiceError> {
    if caller.id == target.id || graph.share_organization(caller, target).await? {
        return Ok(());
    }

    tracing::debug!(
        caller = %caller.user_id,
        target = %target.user_id,
        "User not visible to caller"
    );
    Err(ServiceError::UserNotFound)
}
