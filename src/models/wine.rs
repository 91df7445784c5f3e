// src/models/wine.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

// Limite inferior do ano de safra aceito pelo catálogo.
pub const MIN_VINTAGE_YEAR: i64 = 1900;

// Representa um vinho vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Wine {
    pub id: i64,
    pub name: String,
    pub grape: String,
    pub year: i64,
    pub price_usd: f64,
    pub stock: i64,
    pub is_available: bool,
    pub user_id: i64,
    pub location_code: String,
}

// Dados para cadastro de um vinho
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWinePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "A uva é obrigatória."))]
    pub grape: String,
    pub year: i64,
    #[validate(range(min = 0.0, message = "O preço não pode ser negativo."))]
    pub price_usd: f64,
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: i64,
    #[validate(length(min = 1, message = "O código do local é obrigatório."))]
    pub location_code: String,
    // Usada só quando o local ainda não existe (auto-criação).
    #[serde(default)]
    pub location_description: String,
    pub user_id: i64,
}

// Patch parcial do vinho. Estoque NÃO passa por aqui: o campo existe
// apenas para ser rejeitado com uma mensagem clara — toda mudança de
// estoque usa o endpoint dedicado PUT /wines/{id}/stock.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateWinePayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,
    pub grape: Option<String>,
    pub year: Option<i64>,
    #[validate(range(min = 0.0, message = "O preço não pode ser negativo."))]
    pub price_usd: Option<f64>,
    pub location_code: Option<String>,
    pub stock: Option<i64>,
}

// Corpo do PUT /wines/{id}/stock
#[derive(Debug, Deserialize, Validate)]
pub struct SetStockPayload {
    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: i64,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StockView {
    pub stock: i64,
}

// Projeção de leitura: vinho + local + dono + rótulo de estoque
#[derive(Debug, Serialize)]
pub struct WineView {
    pub id: i64,
    pub name: String,
    pub grape: String,
    pub year: i64,
    pub price_usd: f64,
    pub stock: i64,
    pub is_available: bool,
    pub location_code: String,
    pub location_description: Option<String>,
    pub user_id: i64,
    pub stock_status: &'static str,
}

impl WineView {
    pub fn from_wine(wine: Wine, location_description: Option<String>) -> Self {
        Self {
            id: wine.id,
            name: wine.name,
            grape: wine.grape,
            year: wine.year,
            price_usd: wine.price_usd,
            stock: wine.stock,
            is_available: wine.is_available,
            location_code: wine.location_code,
            location_description,
            user_id: wine.user_id,
            stock_status: stock_status(wine.stock),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedWines {
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
    pub items: Vec<WineView>,
}

// Rótulo derivado do estoque atual.
pub fn stock_status(stock: i64) -> &'static str {
    if stock == 0 {
        "Off stock"
    } else if stock < 5 {
        "Low Stock"
    } else {
        "Good stock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(stock_status(0), "Off stock");
        assert_eq!(stock_status(1), "Low Stock");
        assert_eq!(stock_status(4), "Low Stock");
        assert_eq!(stock_status(5), "Good stock");
        assert_eq!(stock_status(100), "Good stock");
    }
}
