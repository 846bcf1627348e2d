mod config;
mod entities;
mod error;
mod repository;
mod routes;
mod services;
mod utils;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use crate::repository::CatalogRepository;
use crate::routes::AppState;
use crate::services::storage::LocalStorage;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "model_gallery=info,tower_http=info".into()),
        )
        .init();

    let config = config::get_config();

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Best-effort schema evolution: a failed migration is reported but the
    // service keeps running against whatever schema is already in place.
    if let Err(err) = Migrator::up(&db, None).await {
        tracing::error!("Schema migration failed, continuing with existing schema: {}", err);
    }

    let storage = LocalStorage::new(&config.public_dir, &config.models_subdir);
    if let Err(err) = storage.ensure_dirs().await {
        tracing::error!("Failed to create upload directory: {}", err);
    }

    let state = AppState {
        repo: CatalogRepository::new(db),
        storage,
    };
    let app = routes::create_routes(state, &config.public_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
