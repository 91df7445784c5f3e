// src/db/stock_movement_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{common::error::AppError, models::stock_movement::StockMovement};

// O livro-razão de estoque. Só existem INSERT e SELECT aqui: uma
// movimentação nunca é alterada nem apagada depois de registrada.
#[derive(Clone)]
pub struct StockMovementRepository {
    pool: SqlitePool,
}

impl StockMovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        wine_id: i64,
        location_code: &str,
        delta: i64,
        comment: Option<&str>,
        user_id: i64,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        // O timestamp vem daqui (RFC 3339, UTC), não de default do banco.
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (wine_id, location_code, delta, timestamp, comment, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, wine_id, location_code, delta, timestamp, comment, user_id
            "#,
        )
        .bind(wine_id)
        .bind(location_code)
        .bind(delta)
        .bind(Utc::now())
        .bind(comment)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // Sequência ordenada por criação, para auditoria e reconciliação.
    // Re-consultar é stateless: a query não guarda cursor nenhum.
    pub async fn list_for_wine(&self, wine_id: i64) -> Result<Vec<StockMovement>, AppError> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, wine_id, location_code, delta, timestamp, comment, user_id
            FROM stock_movements
            WHERE wine_id = $1
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(wine_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
