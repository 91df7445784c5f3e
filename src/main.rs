//src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use serde_json::json;
use tokio::net::TcpListener;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    app_state
        .seed_bootstrap_admin()
        .await
        .expect("Falha ao semear o admin inicial.");

    // Rotas públicas: login, registro, cadastro de vinho e a vitrine.
    let public_routes = Router::new()
        .route("/authenticate/login", post(handlers::auth::login))
        .route("/users", post(handlers::users::register))
        .route("/wines", post(handlers::wines::create_wine))
        .route("/wines/public", get(handlers::wines::list_public_wines));

    // Rotas protegidas pelo middleware de autenticação.
    let protected_routes = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/wines", get(handlers::wines::list_wines))
        .route("/wines/paginated", get(handlers::wines::list_paginated_wines))
        .route(
            "/wines/{id}",
            get(handlers::wines::get_wine)
                .patch(handlers::wines::update_wine)
                .delete(handlers::wines::delete_wine),
        )
        .route("/wines/{id}/stock", put(handlers::wines::set_stock))
        .route("/wines/{id}/movements", get(handlers::wines::list_wine_movements))
        .route(
            "/locations",
            get(handlers::locations::list_locations).post(handlers::locations::create_location),
        )
        .route(
            "/locations/{code}",
            get(handlers::locations::get_location).delete(handlers::locations::delete_location),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route(
            "/api/dashboard/healthcheck",
            get(|| async { Json(json!({ "status": "ok" })) }),
        )
        .nest("/api/dashboard", public_routes)
        .nest("/api/dashboard", protected_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
