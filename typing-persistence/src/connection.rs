use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://typing_arena.db?mode=rwc";

/// Single-connection in-memory database; every pooled connection would
/// otherwise see its own empty schema.
pub async fn connect_to_memory_database() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(options).await
}

pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied");
    Ok(db)
}

pub async fn memory_database_with_schema() -> Result<DatabaseConnection, DbErr> {
    let db = connect_to_memory_database().await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
