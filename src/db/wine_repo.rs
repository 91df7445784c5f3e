// src/db/wine_repo.rs

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{common::error::AppError, models::wine::Wine};

// Repositório do catálogo de vinhos. O campo 'stock' só é escrito pelos
// métodos dedicados (set_stock / soft_delete): o service garante que
// cada escrita vem acompanhada da linha correspondente no livro-razão.
#[derive(Clone)]
pub struct WineRepository {
    pool: SqlitePool,
}

impl WineRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Leitura pública: só vinhos disponíveis, direto da pool.
    pub async fn list_available(&self) -> Result<Vec<Wine>, AppError> {
        let wines = sqlx::query_as::<_, Wine>(
            r#"
            SELECT id, name, grape, year, price_usd, stock, is_available, user_id, location_code
            FROM wines
            WHERE is_available = 1
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(wines)
    }

    pub async fn count_available(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wines WHERE is_available = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn list_page(&self, offset: i64, limit: i64) -> Result<Vec<Wine>, AppError> {
        let wines = sqlx::query_as::<_, Wine>(
            r#"
            SELECT id, name, grape, year, price_usd, stock, is_available, user_id, location_code
            FROM wines
            WHERE is_available = 1
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(wines)
    }

    // Vinhos ativos apenas: é o caminho das operações de estoque.
    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Wine>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_wine = sqlx::query_as::<_, Wine>(
            r#"
            SELECT id, name, grape, year, price_usd, stock, is_available, user_id, location_code
            FROM wines
            WHERE id = $1 AND is_available = 1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_wine)
    }

    // Inclui soft-deletados: admins precisam inspecionar o estado terminal.
    pub async fn find_by_id_any<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Wine>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let maybe_wine = sqlx::query_as::<_, Wine>(
            r#"
            SELECT id, name, grape, year, price_usd, stock, is_available, user_id, location_code
            FROM wines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_wine)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        name: &str,
        grape: &str,
        year: i64,
        price_usd: f64,
        stock: i64,
        user_id: i64,
        location_code: &str,
    ) -> Result<Wine, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let wine = sqlx::query_as::<_, Wine>(
            r#"
            INSERT INTO wines (name, grape, year, price_usd, stock, is_available, user_id, location_code)
            VALUES ($1, $2, $3, $4, $5, 1, $6, $7)
            RETURNING id, name, grape, year, price_usd, stock, is_available, user_id, location_code
            "#,
        )
        .bind(name)
        .bind(grape)
        .bind(year)
        .bind(price_usd)
        .bind(stock)
        .bind(user_id)
        .bind(location_code)
        .fetch_one(executor)
        .await?;
        Ok(wine)
    }

    // Grava os campos editáveis do registro. 'stock' e 'is_available'
    // ficam de fora de propósito.
    pub async fn update_fields<'e, E>(&self, executor: E, wine: &Wine) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE wines
            SET name = $1, grape = $2, year = $3, price_usd = $4, location_code = $5
            WHERE id = $6
            "#,
        )
        .bind(&wine.name)
        .bind(&wine.grape)
        .bind(wine.year)
        .bind(wine.price_usd)
        .bind(&wine.location_code)
        .bind(wine.id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_stock<'e, E>(
        &self,
        executor: E,
        id: i64,
        new_stock: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE wines SET stock = $1 WHERE id = $2")
            .bind(new_stock)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Estado terminal: indisponível e com estoque zerado.
    pub async fn soft_delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE wines SET is_available = 0, stock = 0 WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Conta TODOS os vinhos do local, inclusive soft-deletados: um local
    // nunca é removido enquanto houver referência a ele.
    pub async fn count_by_location<'e, E>(
        &self,
        executor: E,
        location_code: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wines WHERE location_code = $1")
            .bind(location_code)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }
}
