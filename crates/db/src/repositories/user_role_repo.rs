//! Repository for the `user_roles` table.

use rentify_core::types::DbId;
use sqlx::PgPool;

/// Role grants for users authenticated by the identity provider.
pub struct UserRoleRepo;

impl UserRoleRepo {
    /// Whether `user_id` holds `role`.
    pub async fn has_role(pool: &PgPool, user_id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    /// Grant a role. Granting an existing role is a no-op.
    pub async fn grant(pool: &PgPool, user_id: DbId, role: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_user_roles_user_role DO NOTHING",
        )
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;
        Ok(())
    }
}
