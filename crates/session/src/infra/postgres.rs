//! PostgreSQL Boundary Implementations
//!
//! Talks to the board schema owned by the remote store. The schema is
//! treated as fixed; no migrations are managed here.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::boundary::ProfileStore;
use crate::domain::entity::profile::{Profile, ProfilePatch};
use crate::error::{SessionError, SessionResult};
use kernel::id::UserId;

/// PostgreSQL-backed profile store
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileStore for PgProfileStore {
    async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<Profile>> {
        // First row wins; the read does not lean on a uniqueness
        // constraint for id.
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                id,
                username,
                biography
            FROM profiles
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn insert(&self, profile: &Profile) -> SessionResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (id, username, biography)
            VALUES ($1, $2, $3)
            RETURNING id, username, biography
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.username)
        .bind(&profile.biography)
        .fetch_one(&self.pool)
        .await
        .map_err(classify_insert_error)?;

        Ok(row.into_profile())
    }

    async fn update(&self, user_id: &UserId, patch: &ProfilePatch) -> SessionResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE profiles SET
                username = COALESCE($2, username),
                biography = COALESCE($3, biography)
            WHERE id = $1
            RETURNING id, username, biography
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(patch.username.as_deref())
        .bind(patch.biography.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProfileRow::into_profile)
            .ok_or_else(|| SessionError::Boundary("No profile row to update".to_string()))
    }
}

/// Surface a unique violation on the id column as a provisioning race
fn classify_insert_error(err: sqlx::Error) -> SessionError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return SessionError::DuplicateProfile;
        }
    }
    SessionError::Database(err)
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    username: String,
    biography: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: UserId::from_uuid(self.id),
            username: self.username,
            biography: self.biography.unwrap_or_default(),
        }
    }
}
