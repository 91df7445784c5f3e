// src/services/wine_service.rs

use chrono::{Datelike, Utc};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{LocationRepository, StockMovementRepository, UserRepository, WineRepository},
    middleware::rbac::require_role,
    models::{
        auth::{Role, SessionUser},
        stock_movement::StockMovement,
        wine::{
            CreateWinePayload, MIN_VINTAGE_YEAR, PaginatedWines, UpdateWinePayload, Wine, WineView,
        },
    },
};

// O catálogo de vinhos. Regra central: toda escrita no campo 'stock'
// acontece junto com a linha correspondente no livro-razão, dentro da
// mesma transação. Ou as duas escritas entram, ou nenhuma.
#[derive(Clone)]
pub struct WineService {
    pool: SqlitePool,
    wine_repo: WineRepository,
    location_repo: LocationRepository,
    movement_repo: StockMovementRepository,
    user_repo: UserRepository,
}

impl WineService {
    pub fn new(
        pool: SqlitePool,
        wine_repo: WineRepository,
        location_repo: LocationRepository,
        movement_repo: StockMovementRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            pool,
            wine_repo,
            location_repo,
            movement_repo,
            user_repo,
        }
    }

    fn validate_year(year: i64) -> Result<(), AppError> {
        let current_year = i64::from(Utc::now().year());
        if year < MIN_VINTAGE_YEAR || year > current_year {
            return Err(AppError::InvalidYear(year));
        }
        Ok(())
    }

    // --- CREATE (endpoint público) ---
    pub async fn create(&self, payload: CreateWinePayload) -> Result<WineView, AppError> {
        Self::validate_year(payload.year)?;
        if payload.stock < 0 {
            return Err(AppError::NegativeStock);
        }

        let mut tx = self.pool.begin().await?;

        // O dono precisa existir (e estar ativo).
        self.user_repo
            .find_by_id(&mut *tx, payload.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Auto-criação do local: primeira referência a um código
        // desconhecido cria o registro com a descrição enviada.
        let location = match self
            .location_repo
            .find_by_code(&mut *tx, &payload.location_code)
            .await?
        {
            Some(location) => location,
            None => {
                self.location_repo
                    .insert(&mut *tx, &payload.location_code, &payload.location_description)
                    .await?
            }
        };

        let wine = self
            .wine_repo
            .insert(
                &mut *tx,
                &payload.name,
                &payload.grape,
                payload.year,
                payload.price_usd,
                payload.stock,
                payload.user_id,
                &payload.location_code,
            )
            .await?;

        // Estoque inicial entra no livro-razão como um delta positivo,
        // atribuído ao dono do vinho.
        if wine.stock > 0 {
            self.movement_repo
                .insert(
                    &mut *tx,
                    wine.id,
                    &wine.location_code,
                    wine.stock,
                    Some("Estoque inicial"),
                    wine.user_id,
                )
                .await?;
        }

        tx.commit().await?;

        Ok(WineView::from_wine(wine, Some(location.description)))
    }

    // --- UPDATE parcial (admin) ---
    // Carrega inclusive soft-deletados, para inspeção administrativa.
    // Estoque NÃO muda por aqui: o caminho é único, set_stock.
    pub async fn update(
        &self,
        id: i64,
        patch: UpdateWinePayload,
        caller: &SessionUser,
    ) -> Result<WineView, AppError> {
        require_role(caller, Role::Admin)?;

        if patch.stock.is_some() {
            return Err(AppError::StockUpdateNotAllowed);
        }
        if let Some(year) = patch.year {
            Self::validate_year(year)?;
        }

        let mut tx = self.pool.begin().await?;

        let mut wine = self
            .wine_repo
            .find_by_id_any(&mut *tx, id)
            .await?
            .ok_or(AppError::WineNotFound)?;

        // Trocar de local exige que o destino já exista.
        if let Some(code) = &patch.location_code {
            self.location_repo
                .find_by_code(&mut *tx, code)
                .await?
                .ok_or(AppError::LocationNotFound)?;
        }

        // Aplica campo a campo: ausente = intocado, nunca anulado.
        if let Some(name) = patch.name {
            wine.name = name;
        }
        if let Some(grape) = patch.grape {
            wine.grape = grape;
        }
        if let Some(year) = patch.year {
            wine.year = year;
        }
        if let Some(price_usd) = patch.price_usd {
            wine.price_usd = price_usd;
        }
        if let Some(location_code) = patch.location_code {
            wine.location_code = location_code;
        }

        self.wine_repo.update_fields(&mut *tx, &wine).await?;

        let location = self
            .location_repo
            .find_by_code(&mut *tx, &wine.location_code)
            .await?;

        tx.commit().await?;

        Ok(WineView::from_wine(wine, location.map(|l| l.description)))
    }

    // --- SET STOCK (admin, caminho único de mudança de estoque) ---
    pub async fn set_stock(
        &self,
        id: i64,
        new_stock: i64,
        comment: Option<&str>,
        caller: &SessionUser,
    ) -> Result<i64, AppError> {
        require_role(caller, Role::Admin)?;

        if new_stock < 0 {
            return Err(AppError::NegativeStock);
        }

        let mut tx = self.pool.begin().await?;

        // Só vinhos ativos: estoque de vinho removido é imutável (zero).
        let wine = self
            .wine_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::WineNotFound)?;

        let delta = new_stock - wine.stock;

        // Delta zero não é evento de auditoria: nada a registrar.
        if delta != 0 {
            self.movement_repo
                .insert(&mut *tx, wine.id, &wine.location_code, delta, comment, caller.id)
                .await?;
            self.wine_repo.set_stock(&mut *tx, wine.id, new_stock).await?;
        }

        tx.commit().await?;

        Ok(new_stock)
    }

    // --- SOFT DELETE (admin) ---
    // Zera a posição com um delta compensatório antes de marcar o vinho
    // como indisponível: a soma do razão continua igual ao estoque (0).
    pub async fn soft_delete(&self, id: i64, caller: &SessionUser) -> Result<(), AppError> {
        require_role(caller, Role::Admin)?;

        let mut tx = self.pool.begin().await?;

        let wine = self
            .wine_repo
            .find_by_id_any(&mut *tx, id)
            .await?
            .ok_or(AppError::WineNotFound)?;

        if !wine.is_available {
            return Err(AppError::AlreadyDeleted);
        }

        if wine.stock > 0 {
            self.movement_repo
                .insert(
                    &mut *tx,
                    wine.id,
                    &wine.location_code,
                    -wine.stock,
                    Some("Remoção do catálogo"),
                    caller.id,
                )
                .await?;
        }

        self.wine_repo.soft_delete(&mut *tx, wine.id).await?;

        tx.commit().await?;
        Ok(())
    }

    // --- LEITURAS ---

    pub async fn get(&self, id: i64, caller: &SessionUser) -> Result<WineView, AppError> {
        require_role(caller, Role::Admin)?;

        let wine = self
            .wine_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::WineNotFound)?;

        self.to_view(wine).await
    }

    pub async fn list(&self, caller: &SessionUser) -> Result<Vec<WineView>, AppError> {
        require_role(caller, Role::Admin)?;
        let wines = self.wine_repo.list_available().await?;
        self.to_views(wines).await
    }

    pub async fn list_paginated(
        &self,
        caller: &SessionUser,
        offset: i64,
        limit: i64,
    ) -> Result<PaginatedWines, AppError> {
        require_role(caller, Role::Admin)?;

        let total = self.wine_repo.count_available().await?;
        let wines = self.wine_repo.list_page(offset, limit).await?;
        let items = self.to_views(wines).await?;

        Ok(PaginatedWines {
            total,
            offset,
            limit,
            items,
        })
    }

    // Vitrine: qualquer chamador, sem autenticação.
    pub async fn list_public(&self) -> Result<Vec<WineView>, AppError> {
        let wines = self.wine_repo.list_available().await?;
        self.to_views(wines).await
    }

    // Auditoria do livro-razão de um vinho (inclusive removido).
    pub async fn movements(
        &self,
        id: i64,
        caller: &SessionUser,
    ) -> Result<Vec<StockMovement>, AppError> {
        require_role(caller, Role::Admin)?;

        self.wine_repo
            .find_by_id_any(&self.pool, id)
            .await?
            .ok_or(AppError::WineNotFound)?;

        self.movement_repo.list_for_wine(id).await
    }

    async fn to_view(&self, wine: Wine) -> Result<WineView, AppError> {
        let location = self
            .location_repo
            .find_by_code(&self.pool, &wine.location_code)
            .await?;
        Ok(WineView::from_wine(wine, location.map(|l| l.description)))
    }

    async fn to_views(&self, wines: Vec<Wine>) -> Result<Vec<WineView>, AppError> {
        let mut views = Vec::with_capacity(wines.len());
        for wine in wines {
            views.push(self.to_view(wine).await?);
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{
        admin_session, create_wine_payload, seed_user, session_for, test_pool, wine_service,
    };

    // Soma dos deltas do razão, na visão de auditoria do próprio service.
    async fn ledger_sum(service: &WineService, admin: &SessionUser, wine_id: i64) -> i64 {
        service
            .movements(wine_id, admin)
            .await
            .unwrap()
            .iter()
            .map(|m| m.delta)
            .sum()
    }

    #[tokio::test]
    async fn create_with_initial_stock_writes_one_ledger_entry() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 30, "A1", admin.id))
            .await
            .unwrap();

        assert_eq!(view.stock, 30);
        assert_eq!(view.stock_status, "Good stock");

        let movements = service.movements(view.id, &admin).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].delta, 30);
        assert_eq!(movements[0].wine_id, view.id);
        assert_eq!(movements[0].location_code, "A1");
    }

    #[tokio::test]
    async fn create_with_zero_stock_writes_nothing_to_the_ledger() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Tannat", 0, "A1", admin.id))
            .await
            .unwrap();

        assert_eq!(view.stock_status, "Off stock");
        assert!(service.movements(view.id, &admin).await.unwrap().is_empty());
    }

    // Cenário completo da contabilidade: 30 -> 25 -> remoção.
    // Em todos os pontos, stock == soma dos deltas.
    #[tokio::test]
    async fn ledger_sum_tracks_stock_through_the_whole_lifecycle() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 30, "A1", admin.id))
            .await
            .unwrap();
        assert_eq!(ledger_sum(&service, &admin, view.id).await, 30);

        let stock = service.set_stock(view.id, 25, None, &admin).await.unwrap();
        assert_eq!(stock, 25);
        let movements = service.movements(view.id, &admin).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[1].delta, -5);
        assert_eq!(ledger_sum(&service, &admin, view.id).await, 25);

        service.soft_delete(view.id, &admin).await.unwrap();
        let movements = service.movements(view.id, &admin).await.unwrap();
        assert_eq!(movements.len(), 3);
        assert_eq!(movements[2].delta, -25);
        assert_eq!(ledger_sum(&service, &admin, view.id).await, 0);
    }

    #[tokio::test]
    async fn set_stock_to_the_same_value_is_not_an_audit_event() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 7, "A1", admin.id))
            .await
            .unwrap();

        service.set_stock(view.id, 7, None, &admin).await.unwrap();

        assert_eq!(service.movements(view.id, &admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_stock_negative_fails_and_changes_nothing() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 7, "A1", admin.id))
            .await
            .unwrap();

        let result = service.set_stock(view.id, -1, None, &admin).await;
        assert!(matches!(result, Err(AppError::NegativeStock)));

        let after = service.get(view.id, &admin).await.unwrap();
        assert_eq!(after.stock, 7);
        assert_eq!(service.movements(view.id, &admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn set_stock_records_caller_and_comment() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let owner = seed_user(&pool, "dono", "segredo1", Role::User, true).await;
        let view = service
            .create(create_wine_payload("Malbec", 10, "A1", owner.id))
            .await
            .unwrap();

        service
            .set_stock(view.id, 4, Some("inventário anual"), &admin)
            .await
            .unwrap();

        let movements = service.movements(view.id, &admin).await.unwrap();
        // Criação atribuída ao dono; ajuste atribuído ao admin chamador.
        assert_eq!(movements[0].user_id, owner.id);
        assert_eq!(movements[1].user_id, admin.id);
        assert_eq!(movements[1].comment.as_deref(), Some("inventário anual"));
    }

    #[tokio::test]
    async fn soft_delete_zeroes_the_position_with_one_compensating_entry() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 7, "A1", admin.id))
            .await
            .unwrap();

        service.soft_delete(view.id, &admin).await.unwrap();

        let movements = service.movements(view.id, &admin).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[1].delta, -7);

        // Some das leituras normais, mas o razão fica auditável.
        assert!(matches!(
            service.get(view.id, &admin).await,
            Err(AppError::WineNotFound)
        ));
        assert_eq!(ledger_sum(&service, &admin, view.id).await, 0);
    }

    #[tokio::test]
    async fn soft_delete_twice_reports_already_deleted() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 0, "A1", admin.id))
            .await
            .unwrap();

        service.soft_delete(view.id, &admin).await.unwrap();
        assert!(matches!(
            service.soft_delete(view.id, &admin).await,
            Err(AppError::AlreadyDeleted)
        ));
    }

    #[tokio::test]
    async fn stock_operations_refuse_deleted_wines() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 5, "A1", admin.id))
            .await
            .unwrap();
        service.soft_delete(view.id, &admin).await.unwrap();

        assert!(matches!(
            service.set_stock(view.id, 9, None, &admin).await,
            Err(AppError::WineNotFound)
        ));
    }

    #[tokio::test]
    async fn vintage_year_bounds() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let mut too_old = create_wine_payload("Relíquia", 1, "A1", admin.id);
        too_old.year = 1899;
        assert!(matches!(
            service.create(too_old).await,
            Err(AppError::InvalidYear(1899))
        ));

        let mut current = create_wine_payload("Safra nova", 1, "A1", admin.id);
        current.year = i64::from(Utc::now().year());
        assert!(service.create(current).await.is_ok());
    }

    #[tokio::test]
    async fn create_auto_creates_the_referenced_location() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let mut payload = create_wine_payload("Malbec", 2, "Z9", admin.id);
        payload.location_description = "fundo da adega".to_string();

        let view = service.create(payload).await.unwrap();
        assert_eq!(view.location_code, "Z9");
        assert_eq!(view.location_description.as_deref(), Some("fundo da adega"));

        // Segunda referência reaproveita o local, sem trocar a descrição.
        let mut second = create_wine_payload("Tannat", 2, "Z9", admin.id);
        second.location_description = "outra descrição".to_string();
        let view = service.create(second).await.unwrap();
        assert_eq!(view.location_description.as_deref(), Some("fundo da adega"));
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 3, "A1", admin.id))
            .await
            .unwrap();

        let patch = UpdateWinePayload {
            name: Some("Malbec Reserva".to_string()),
            price_usd: Some(22.0),
            ..Default::default()
        };
        let updated = service.update(view.id, patch, &admin).await.unwrap();

        assert_eq!(updated.name, "Malbec Reserva");
        assert_eq!(updated.price_usd, 22.0);
        // O que não veio no patch fica como estava.
        assert_eq!(updated.grape, "Malbec");
        assert_eq!(updated.year, 2021);
        assert_eq!(updated.stock, 3);
    }

    #[tokio::test]
    async fn update_refuses_stock_edits() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 3, "A1", admin.id))
            .await
            .unwrap();

        let patch = UpdateWinePayload {
            stock: Some(50),
            ..Default::default()
        };
        assert!(matches!(
            service.update(view.id, patch, &admin).await,
            Err(AppError::StockUpdateNotAllowed)
        ));

        // Nada mudou, nem no razão.
        let after = service.get(view.id, &admin).await.unwrap();
        assert_eq!(after.stock, 3);
        assert_eq!(service.movements(view.id, &admin).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_requires_an_existing_target_location() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let view = service
            .create(create_wine_payload("Malbec", 3, "A1", admin.id))
            .await
            .unwrap();

        let patch = UpdateWinePayload {
            location_code: Some("NAO-EXISTE".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(view.id, patch, &admin).await,
            Err(AppError::LocationNotFound)
        ));
    }

    #[tokio::test]
    async fn admin_gates_hold_for_regular_users() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let user = seed_user(&pool, "comum", "segredo1", Role::User, true).await;
        let user_session = session_for(user.id, "comum", Role::User);

        let view = service
            .create(create_wine_payload("Malbec", 3, "A1", admin.id))
            .await
            .unwrap();

        assert!(matches!(
            service.set_stock(view.id, 1, None, &user_session).await,
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            service.soft_delete(view.id, &user_session).await,
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            service.list(&user_session).await,
            Err(AppError::NotAuthorized)
        ));
        assert!(matches!(
            service.get(view.id, &user_session).await,
            Err(AppError::NotAuthorized)
        ));

        // A vitrine pública continua aberta.
        assert_eq!(service.list_public().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn pagination_reports_totals() {
        let pool = test_pool().await;
        let admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        for i in 0..5 {
            service
                .create(create_wine_payload(&format!("Vinho {i}"), 1, "A1", admin.id))
                .await
                .unwrap();
        }

        let page = service.list_paginated(&admin, 2, 2).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.offset, 2);
        assert_eq!(page.limit, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn create_requires_an_existing_owner() {
        let pool = test_pool().await;
        let _admin = admin_session(&pool).await;
        let service = wine_service(&pool);

        let payload = create_wine_payload("Malbec", 3, "A1", 9999);
        assert!(matches!(
            service.create(payload).await,
            Err(AppError::UserNotFound)
        ));
    }
}
