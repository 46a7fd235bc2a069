/// User lookups on behalf of an authenticated caller.

use std::sync::Arc;

use super::membership::MembershipGraph;
use crate::auth::authorization::require_user_visible;
use crate::auth::identity::Identity;
use crate::error::ServiceError;
use crate::models::user::PublicUser;
use crate::store::IdentityStore;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn IdentityStore>,
    graph: MembershipGraph,
}

impl UserService {
    pub fn new(store: Arc<dyn IdentityStore>, graph: MembershipGraph) -> Self {
        Self { store, graph }
    }

    /// Public record of `user_id`, visible to the user themselves and to
    /// anyone sharing an organization with them
    ///
    /// # Errors
    ///
    /// `ServiceError::UserNotFound` if the user doesn't exist or isn't visible
    pub async fn show(&self, caller: &Identity, user_id: &str) -> Result<PublicUser, ServiceError> {
        let user = self
            .store
            .find_user_by_user_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        require_user_visible(&self.graph, caller, &user).await?;

        Ok(PublicUser::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids;
    use crate::models::organization::NewOrganization;
    use crate::models::user::{NewUser, User};
    use crate::store::{InMemoryStore, MembershipStore};

    async fn register(store: &InMemoryStore, name: &str) -> (User, uuid::Uuid) {
        let (user, org) = store
            .register(
                NewUser {
                    id: ids::new_internal_id(),
                    user_id: ids::new_user_id(),
                    first_name: name.to_string(),
                    last_name: "Test".to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    password_hash: "hash".to_string(),
                    phone: None,
                },
                NewOrganization::default_for(name),
            )
            .await
            .unwrap();
        (user, org.id)
    }

    #[tokio::test]
    async fn test_user_visibility_follows_shared_membership() {
        let store = InMemoryStore::new();
        let shared: Arc<dyn IdentityStore> = Arc::new(store.clone());
        let users = UserService::new(shared.clone(), MembershipGraph::new(shared));

        let (alice, alice_org) = register(&store, "Alice").await;
        let (bob, _) = register(&store, "Bob").await;
        let alice_id = Identity::from(&alice);
        let bob_id = Identity::from(&bob);

        assert_eq!(users.show(&alice_id, &alice.user_id).await.unwrap().email, alice.email);
        assert!(matches!(
            users.show(&alice_id, &bob.user_id).await,
            Err(ServiceError::UserNotFound)
        ));

        store.attach(bob.id, alice_org).await.unwrap();

        assert_eq!(users.show(&alice_id, &bob.user_id).await.unwrap().user_id, bob.user_id);
        assert_eq!(users.show(&bob_id, &alice.user_id).await.unwrap().user_id, alice.user_id);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = InMemoryStore::new();
        let shared: Arc<dyn IdentityStore> = Arc::new(store.clone());
        let users = UserService::new(shared.clone(), MembershipGraph::new(shared));
        let (alice, _) = register(&store, "Alice").await;

        assert!(matches!(
            users.show(&Identity::from(&alice), "missing").await,
            Err(ServiceError::UserNotFound)
        ));
    }
}
