// src/models/location.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

// Um local de armazenamento (prateleira, corredor...). O código é a
// chave primária; vinhos referenciam o local por ele.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Location {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,
    #[serde(default)]
    pub description: String,
}
