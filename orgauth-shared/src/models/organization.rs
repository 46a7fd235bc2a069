/// Organization model and database operations
///
/// Organizations group users through memberships. Like users, they carry an
/// internal storage key and an external `org_id`.
///
/// There is intentionally no "find by org_id" here: organization lookups by
/// external id go through membership-scoped queries in
/// [`crate::models::membership`], so a caller can only resolve organizations it
/// belongs to.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id UUID PRIMARY KEY,
///     org_id VARCHAR(64) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use uuid::Uuid;

/// Organization model
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Organization {
    /// Internal storage key
    pub id: Uuid,

    /// External identifier
    pub org_id: String,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting an organization
#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub id: Uuid,
    pub org_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewOrganization {
    /// Builds a new organization with freshly generated identifiers
    pub fn generate(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: crate::ids::new_internal_id(),
            org_id: crate::ids::new_org_id(),
            name: name.into(),
            description,
        }
    }

    /// The organization every user receives at registration
    pub fn default_for(first_name: &str) -> Self {
        Self::generate(
            format!("{}'s Organization", first_name),
            Some(format!("Default organization for {}", first_name)),
        )
    }
}

/// Fields of an organization that may leave the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
    pub org_id: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Organization> for OrganizationView {
    fn from(org: &Organization) -> Self {
        Self {
            org_id: org.org_id.clone(),
            name: org.name.clone(),
            description: org.description.clone(),
        }
    }
}

impl From<Organization> for OrganizationView {
    fn from(org: Organization) -> Self {
        Self {
            org_id: org.org_id,
            name: org.name,
            description: org.description,
        }
    }
}

impl Organization {
    /// Builds the in-memory record a `NewOrganization` becomes once stored
    pub fn from_new(data: NewOrganization, now: DateTime<Utc>) -> Self {
        Self {
            id: data.id,
            org_id: data.org_id,
            name: data.name,
            description: data.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a new organization
    ///
    /// # Errors
    ///
    /// Returns an error if the external id collides (`organizations_org_id_key`)
    /// or the database fails
    pub async fn create<'e, E>(executor: E, data: NewOrganization) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, org_id, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, org_id, name, description, created_at, updated_at
            "#,
        )
        .bind(data.id)
        .bind(data.org_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_organization_naming() {
        let org = NewOrganization::default_for("alems");

        assert_eq!(org.name, "alems's Organization");
        assert_eq!(org.description.as_deref(), Some("Default organization for alems"));
        assert_eq!(org.org_id.len(), 32);
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let org = Organization::from_new(
            NewOrganization::generate("Acme", None),
            Utc::now(),
        );
        let json = serde_json::to_value(OrganizationView::from(&org)).unwrap();

        assert_eq!(json["orgId"], org.org_id);
        assert_eq!(json["name"], "Acme");
        assert!(json["description"].is_null());
        assert!(json.get("id").is_none());
    }
}
