/// External identifier generation
///
/// Users and organizations carry two identifiers: an internal UUID primary key
/// that never leaves the storage layer, and an opaque external identifier
/// (`userId` / `orgId`) that is the only one exposed over the API.
///
/// External identifiers are random UUIDv4 values rendered without hyphens.
/// Each carries 122 random bits, so the probability of any collision among
/// `n` identifiers is bounded by `n² / 2¹²³` (about 10⁻¹⁵ for a billion ids).
/// Storage still enforces uniqueness with a constraint, turning the residual
/// risk into a failed insert instead of a shared identity.
///
/// # Example
///
/// ```
/// use orgauth_shared::ids::{new_org_id, new_user_id};
///
/// let user_id = new_user_id();
/// let org_id = new_org_id();
/// assert_ne!(user_id, org_id);
/// assert_eq!(user_id.len(), 32);
/// ```

use uuid::Uuid;

/// Generates a new external user identifier
pub fn new_user_id() -> String {
    opaque_id()
}

/// Generates a new external organization identifier
pub fn new_org_id() -> String {
    opaque_id()
}

/// Generates a new internal storage key
pub fn new_internal_id() -> Uuid {
    Uuid::new_v4()
}

fn opaque_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_hex_without_hyphens() {
        let id = new_user_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_unique_across_many_draws() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_org_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_internal_id_differs_from_external_id() {
        let internal = new_internal_id();
        let external = new_user_id();
        assert_ne!(internal.simple().to_string(), external);
    }
}
