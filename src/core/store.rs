use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::auth::store::{StoredUser, UserStore};
use crate::core::error::Error;
use crate::types::response;

#[derive(Clone, Debug)]
pub(crate) struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get(&self, id: i32) -> Result<Option<response::User>, Error> {
        match sqlx::query("SELECT id, email FROM users WHERE id = $1;")
            .bind(id)
            .map(map_public_user)
            .fetch_one(&self.pool)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn list(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<response::User>, i64), Error> {
        let total_count: i64 = sqlx::query("SELECT COUNT(*) AS total_count FROM users;")
            .map(|row: PgRow| row.get("total_count"))
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query("SELECT id, email FROM users ORDER BY id OFFSET $1 LIMIT $2;")
            .bind(skip)
            .bind(limit)
            .map(map_public_user)
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total_count))
    }

    pub(crate) async fn update_email(
        &self,
        id: i32,
        email: &str,
    ) -> Result<response::User, Error> {
        match sqlx::query("UPDATE users SET email = $2 WHERE id = $1 RETURNING id, email;")
            .bind(id)
            .bind(email)
            .map(map_public_user)
            .fetch_one(&self.pool)
            .await
        {
            Ok(user) => Ok(user),
            Err(sqlx::Error::RowNotFound) => Err(Error::UserNotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UserAlreadyExists)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn delete(&self, id: i32) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<StoredUser>, Error> {
        match sqlx::query("SELECT id, email, password_hash FROM users WHERE email = $1;")
            .bind(subject)
            .map(map_stored_user)
            .fetch_one(&self.pool)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn save(&self, subject: &str, password_digest: &str) -> Result<i32, Error> {
        match sqlx::query("INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id;")
            .bind(subject)
            .bind(password_digest)
            .map(|row: PgRow| row.get("id"))
            .fetch_one(&self.pool)
            .await
        {
            Ok(id) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UserAlreadyExists)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }
}

fn map_stored_user(row: PgRow) -> StoredUser {
    StoredUser {
        id: row.get("id"),
        subject: row.get("email"),
        password_digest: row.get("password_hash"),
    }
}

fn map_public_user(row: PgRow) -> response::User {
    response::User {
        id: row.get("id"),
        email: row.get("email"),
    }
}
