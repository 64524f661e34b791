use clap::Parser;
use dotenv::dotenv;

use crate::config::Config;

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;
pub mod shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    let postgres_connection = repositories::create_postgres_pool(&config).await?;

    match config.mode.as_str() {
        "console" => shell::run(postgres_connection).await,
        _ => controller::serve(postgres_connection, &config).await,
    }
}
