// src/services/location_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{LocationRepository, WineRepository},
    middleware::rbac::require_role,
    models::{
        auth::{Role, SessionUser},
        location::{CreateLocationPayload, Location},
    },
};

#[derive(Clone)]
pub struct LocationService {
    pool: SqlitePool,
    location_repo: LocationRepository,
    wine_repo: WineRepository,
}

impl LocationService {
    pub fn new(pool: SqlitePool, location_repo: LocationRepository, wine_repo: WineRepository) -> Self {
        Self {
            pool,
            location_repo,
            wine_repo,
        }
    }

    pub async fn list(&self, caller: &SessionUser) -> Result<Vec<Location>, AppError> {
        require_role(caller, Role::Admin)?;
        self.location_repo.list().await
    }

    pub async fn get(&self, code: &str, caller: &SessionUser) -> Result<Location, AppError> {
        require_role(caller, Role::Admin)?;
        self.location_repo
            .find_by_code(&self.pool, code)
            .await?
            .ok_or(AppError::LocationNotFound)
    }

    // Criação explícita; código duplicado é conflito (diferente do
    // caminho de auto-criação do catálogo, que reaproveita o existente).
    pub async fn create(
        &self,
        payload: CreateLocationPayload,
        caller: &SessionUser,
    ) -> Result<Location, AppError> {
        require_role(caller, Role::Admin)?;
        self.location_repo
            .insert(&self.pool, &payload.code, &payload.description)
            .await
    }

    // Remove um local SEM vinhos associados — contando também os
    // soft-deletados, que ainda referenciam o código.
    pub async fn delete(&self, code: &str, caller: &SessionUser) -> Result<(), AppError> {
        require_role(caller, Role::Admin)?;

        let mut tx = self.pool.begin().await?;

        self.location_repo
            .find_by_code(&mut *tx, code)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        let references = self.wine_repo.count_by_location(&mut *tx, code).await?;
        if references > 0 {
            return Err(AppError::LocationInUse(code.to_string()));
        }

        self.location_repo.delete(&mut *tx, code).await?;

        tx.commit().await?;
        Ok(())
    }
}
