use env_logger::Env;
use pacific_dashboard::app;
use pacific_dashboard::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    // RUST_LOG wins; otherwise the DEBUG flag picks the default filter.
    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    app::run(config).await
}
