// src/db/location_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{common::error::AppError, models::location::Location};

// Repositório de locais de armazenamento. Chave é o próprio código.
#[derive(Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Location>, AppError> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT code, description FROM locations ORDER BY code ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(locations)
    }

    pub async fn find_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_location = sqlx::query_as::<_, Location>(
            "SELECT code, description FROM locations WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_location)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        code: &str,
        description: &str,
    ) -> Result<Location, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (code, description)
            VALUES ($1, $2)
            RETURNING code, description
            "#,
        )
        .bind(code)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::LocationAlreadyExists(code.to_string());
                }
            }
            e.into()
        })?;
        Ok(location)
    }

    pub async fn delete<'e, E>(&self, executor: E, code: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("DELETE FROM locations WHERE code = $1")
            .bind(code)
            .execute(executor)
            .await?;
        Ok(())
    }
}
