// src/services/user_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::rbac::{require_role, require_self_or_admin},
    models::{
        auth::{Role, SessionUser},
        user::{RegisterUserPayload, UpdateUserPayload, UserView},
    },
};

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool, user_repo: UserRepository) -> Self {
        Self { pool, user_repo }
    }

    // Registro público. Sempre cria 'user': pedir 'admin' aqui é
    // recusado — promoção passa pelo update, feito por um admin.
    pub async fn register(&self, payload: RegisterUserPayload) -> Result<UserView, AppError> {
        if payload.role == Some(Role::Admin) {
            return Err(AppError::NotAuthorized);
        }

        let password_hash = crate::services::auth::hash_password(&payload.password).await?;

        let user = self
            .user_repo
            .insert(
                &self.pool,
                &payload.username,
                &password_hash,
                &payload.first_name,
                &payload.last_name,
                Role::User,
            )
            .await?;

        Ok(user.into())
    }

    pub async fn list(&self, caller: &SessionUser) -> Result<Vec<UserView>, AppError> {
        require_role(caller, Role::Admin)?;
        let users = self.user_repo.list(&self.pool).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64, caller: &SessionUser) -> Result<UserView, AppError> {
        require_self_or_admin(caller, id)?;

        let user = self
            .user_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(user.into())
    }

    // Update parcial (admin). Enxerga contas desativadas, então também
    // serve para reativar via is_active.
    pub async fn update(
        &self,
        id: i64,
        patch: UpdateUserPayload,
        caller: &SessionUser,
    ) -> Result<UserView, AppError> {
        require_role(caller, Role::Admin)?;

        // O hash acontece antes da transação: não toca no banco.
        let new_password_hash = match &patch.password {
            Some(password) => Some(crate::services::auth::hash_password(password).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let mut user = self
            .user_repo
            .find_by_id_any(&mut *tx, id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(is_active) = patch.is_active {
            user.is_active = is_active;
        }
        if let Some(password_hash) = new_password_hash {
            user.password_hash = password_hash;
        }

        self.user_repo.update(&mut *tx, &user).await?;

        tx.commit().await?;

        Ok(user.into())
    }

    // Soft delete (admin): a conta some das leituras e perde o login.
    pub async fn delete(&self, id: i64, caller: &SessionUser) -> Result<(), AppError> {
        require_role(caller, Role::Admin)?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .find_by_id_any(&mut *tx, id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.is_active {
            return Err(AppError::AlreadyDeleted);
        }

        self.user_repo.soft_delete(&mut *tx, user.id).await?;

        tx.commit().await?;
        Ok(())
    }
}
