// src/middleware/rbac.rs

use crate::{
    common::error::AppError,
    models::auth::{Role, SessionUser},
};

// Política de acesso centralizada. Os services chamam estas duas
// funções em vez de comparar roles à mão em cada operação.

// Falha com NotAuthorized quando o papel do chamador não basta.
// Admin passa em qualquer exigência.
pub fn require_role(caller: &SessionUser, required: Role) -> Result<(), AppError> {
    if caller.role == Role::Admin || caller.role == required {
        return Ok(());
    }
    Err(AppError::NotAuthorized)
}

// Exceção de "perfil próprio": um usuário comum pode ler o próprio
// recurso; qualquer outro exige admin.
pub fn require_self_or_admin(caller: &SessionUser, user_id: i64) -> Result<(), AppError> {
    if caller.role == Role::Admin || caller.id == user_id {
        return Ok(());
    }
    Err(AppError::NotAuthorized)
}
