use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    /// Either "server" for the HTTP API or "console" for the operator shell
    #[clap(env, long, default_value = "server")]
    pub mode: String,

    #[clap(env, long, default_value = "http://localhost:5173")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 3000)]
    pub server_port: u16,

    #[clap(env, long, default_value = "localhost")]
    pub postgres_host: String,

    #[clap(env, long, default_value_t = 5432)]
    pub postgres_port: u16,

    #[clap(env, long, default_value = "postgres")]
    pub postgres_user: String,

    #[clap(env, long, default_value = "postgres")]
    pub postgres_password: String,

    #[clap(env, long, default_value = "parking")]
    pub postgres_db: String,
}
