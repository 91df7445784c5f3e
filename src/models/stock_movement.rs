// src/models/stock_movement.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

// Uma linha do livro-razão de estoque. Imutável depois de criada:
// a soma dos deltas de um vinho, em ordem de criação, é sempre igual
// ao campo 'stock' atual dele.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockMovement {
    pub id: i64,
    pub wine_id: i64,
    pub location_code: String,
    pub delta: i64,
    pub timestamp: DateTime<Utc>,
    pub comment: Option<String>,
    pub user_id: i64,
}
