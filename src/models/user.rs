// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{Role, User};

// Dados para registro de um novo usuário.
// O papel não é aceito aqui: registro público sempre cria 'user';
// promoção a admin acontece via update, feita por um admin.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "O username deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "O primeiro nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    pub role: Option<Role>,
}

// Patch parcial: campos ausentes ficam como estão, nunca são anulados.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserPayload {
    #[validate(length(min = 3, message = "O username deve ter no mínimo 3 caracteres."))]
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
}

// Projeção de leitura (sem o hash da senha)
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            is_active: user.is_active,
        }
    }
}
