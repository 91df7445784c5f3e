// src/common/test_support.rs
//
// Infraestrutura compartilhada dos testes: banco SQLite em memória com
// as migrações aplicadas, seeds e fábricas de services.

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::{
    db::{LocationRepository, StockMovementRepository, UserRepository, WineRepository},
    models::{
        auth::{Role, SessionUser, User},
        wine::CreateWinePayload,
    },
    services::wine_service::WineService,
};

// Uma conexão só: cada teste enxerga o mesmo banco em memória.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("falha ao abrir o banco em memória");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("falha ao rodar as migrações");

    pool
}

// Insere um usuário direto no banco. Custo 4 do bcrypt: o mínimo,
// para os testes não pagarem o preço do DEFAULT_COST.
pub async fn seed_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: Role,
    is_active: bool,
) -> User {
    let password_hash = bcrypt::hash(password, 4).expect("falha no hash de teste");

    let mut user = UserRepository::new(pool.clone())
        .insert(pool, username, &password_hash, "Nome", "Teste", role)
        .await
        .expect("falha ao inserir usuário de teste");

    if !is_active {
        UserRepository::new(pool.clone())
            .soft_delete(pool, user.id)
            .await
            .expect("falha ao desativar usuário de teste");
        user.is_active = false;
    }

    user
}

pub fn session_for(id: i64, username: &str, role: Role) -> SessionUser {
    SessionUser {
        id,
        username: username.to_string(),
        role,
    }
}

// Cria um admin no banco e devolve a sessão dele.
pub async fn admin_session(pool: &SqlitePool) -> SessionUser {
    let user = seed_user(pool, "admin-teste", "segredo-admin", Role::Admin, true).await;
    session_for(user.id, "admin-teste", Role::Admin)
}

pub fn wine_service(pool: &SqlitePool) -> WineService {
    WineService::new(
        pool.clone(),
        WineRepository::new(pool.clone()),
        LocationRepository::new(pool.clone()),
        StockMovementRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
    )
}

pub fn create_wine_payload(name: &str, stock: i64, location_code: &str, user_id: i64) -> CreateWinePayload {
    CreateWinePayload {
        name: name.to_string(),
        grape: "Malbec".to_string(),
        year: 2021,
        price_usd: 15.5,
        stock,
        location_code: location_code.to_string(),
        location_description: "prateleira de teste".to_string(),
        user_id,
    }
}
