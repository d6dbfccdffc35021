//! Applies pending schema migrations and exits.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use sso::MIGRATOR;
use sso::config::ServerConfig;
use sso::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    init_tracing(config.environment);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    MIGRATOR.run(&pool).await.context("run migrations")?;

    tracing::info!(
        migrations = MIGRATOR.iter().count(),
        "Migrations applied successfully"
    );

    pool.close().await;

    Ok(())
}
