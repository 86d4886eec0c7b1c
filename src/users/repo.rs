use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::User;

/// Storage operations behind the users endpoints and the startup table check.
///
/// Single-row mutations return `Ok(None)` when no row matched; that is the
/// not-found branch, not an error.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn users_table_exists(&self) -> anyhow::Result<bool>;
    async fn create_users_table(&self) -> anyhow::Result<()>;

    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn create(&self, name: Option<&str>, email: Option<&str>) -> anyhow::Result<User>;
    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<Option<User>>;
    async fn delete(&self, id: i32) -> anyhow::Result<Option<User>>;
    /// Removes every row and restarts the id sequence at 1.
    async fn delete_all(&self) -> anyhow::Result<()>;

    async fn close(&self);
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn users_table_exists(&self) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                  FROM information_schema.tables
                 WHERE table_schema = current_schema()
                   AND table_name = 'users'
            )
            "#,
        )
        .fetch_one(&self.db)
        .await
        .context("check users table")?;
        Ok(exists)
    }

    async fn create_users_table(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255),
                email VARCHAR(255)
            )
            "#,
        )
        .execute(&self.db)
        .await
        .context("create users table")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
              FROM users
             ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
              FROM users
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user")?;
        Ok(row)
    }

    async fn create(&self, name: Option<&str>, email: Option<&str>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $1, email = $2
             WHERE id = $3
            RETURNING id, name, email
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
             WHERE id = $1
            RETURNING id, name, email
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete user")?;
        Ok(row)
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        // RESTART IDENTITY resets users_id_seq, so the next insert gets id 1.
        sqlx::query("TRUNCATE TABLE users RESTART IDENTITY")
            .execute(&self.db)
            .await
            .context("truncate users")?;
        Ok(())
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
