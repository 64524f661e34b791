use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;

use crate::config::Config;

pub mod postgres_repo;

pub async fn create_postgres_pool(
    config: &Config,
) -> anyhow::Result<Pool<PostgresConnectionManager<NoTls>>> {
    let connection_string = format!(
        "host={} port={} user={} password={} dbname={}",
        config.postgres_host,
        config.postgres_port,
        config.postgres_user,
        config.postgres_password,
        config.postgres_db,
    );
    let manager = PostgresConnectionManager::new_from_stringlike(connection_string, NoTls)
        .context("Invalid postgres connection configuration")?;

    Pool::builder()
        .build(manager)
        .await
        .context("Failed to build the postgres connection pool")
}
