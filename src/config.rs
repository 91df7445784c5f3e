// src/config.rs

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{LocationRepository, StockMovementRepository, UserRepository, WineRepository},
    models::auth::Role,
    services::{
        auth::AuthService, location_service::LocationService, user_service::UserService,
        wine_service::WineService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub wine_service: WineService,
    pub location_service: LocationService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let wine_repo = WineRepository::new(db_pool.clone());
        let location_repo = LocationRepository::new(db_pool.clone());
        let movement_repo = StockMovementRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let user_service = UserService::new(db_pool.clone(), user_repo.clone());
        let wine_service = WineService::new(
            db_pool.clone(),
            wine_repo.clone(),
            location_repo.clone(),
            movement_repo,
            user_repo.clone(),
        );
        let location_service = LocationService::new(db_pool.clone(), location_repo, wine_repo);

        Ok(Self {
            db_pool,
            auth_service,
            user_service,
            wine_service,
            location_service,
        })
    }

    // O registro público nunca cria admins, então o primeiro admin nasce
    // aqui: se a tabela de usuários estiver vazia e ADMIN_USERNAME /
    // ADMIN_PASSWORD estiverem definidos, semeia a conta.
    pub async fn seed_bootstrap_admin(&self) -> anyhow::Result<()> {
        let user_repo = UserRepository::new(self.db_pool.clone());

        if user_repo.count().await? > 0 {
            return Ok(());
        }

        let (Ok(username), Ok(password)) =
            (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD"))
        else {
            tracing::warn!(
                "Nenhum usuário no banco e ADMIN_USERNAME/ADMIN_PASSWORD ausentes: \
                 pulando o seed do admin inicial."
            );
            return Ok(());
        };

        let password_hash = crate::services::auth::hash_password(&password)
            .await
            .map_err(|e| anyhow::anyhow!("falha no hash do admin inicial: {e}"))?;

        user_repo
            .insert(
                &self.db_pool,
                &username,
                &password_hash,
                "Admin",
                "Inicial",
                Role::Admin,
            )
            .await
            .map_err(|e| anyhow::anyhow!("falha ao criar o admin inicial: {e}"))?;

        tracing::info!("👤 Admin inicial '{}' criado.", username);
        Ok(())
    }
}
