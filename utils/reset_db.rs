use sea_orm::{ConnectionTrait, Database, DbBackend, Statement};
use std::env;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://3d_models.sqlite?mode=rwc".to_string());

    let db = Database::connect(database_url)
        .await
        .expect("Failed to connect to database");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "DROP TABLE IF EXISTS models;".to_owned(),
    ))
    .await
    .unwrap();
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "DROP TABLE IF EXISTS seaql_migrations;".to_owned(),
    ))
    .await
    .unwrap();
    println!("Database reset successfully");
}
