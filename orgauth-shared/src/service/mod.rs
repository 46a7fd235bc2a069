/// Business operations
///
/// Services take an explicit [`Identity`](crate::auth::identity::Identity)
/// wherever the result depends on the caller, and depend only on the store
/// traits.
///
/// - [`credentials`]: user creation, lookups and password checks
/// - [`membership`]: the user-organization graph
/// - [`registration`]: register and login
/// - [`organizations`]: membership-gated organization operations
/// - [`users`]: membership-gated user lookups

pub mod credentials;
pub mod membership;
pub mod organizations;
pub mod registration;
pub mod users;

use std::sync::Arc;

use crate::auth::jwt::TokenIssuer;
use crate::clock::Clock;
use crate::store::IdentityStore;

use credentials::CredentialStore;
use membership::MembershipGraph;
use organizations::OrganizationService;
use registration::AuthService;
use users::UserService;

/// All services wired over one store
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub organizations: OrganizationService,
    pub users: UserService,
}

impl Services {
    pub fn new(store: Arc<dyn IdentityStore>, tokens: TokenIssuer, clock: Arc<dyn Clock>) -> Self {
        let graph = MembershipGraph::new(store.clone());

        Self {
            auth: AuthService::new(CredentialStore::new(store.clone()), tokens, clock),
            organizations: OrganizationService::new(store.clone(), graph.clone()),
            users: UserService::new(store, graph),
        }
    }
}
