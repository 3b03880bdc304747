use fleetbook::config::Config;
use fleetbook::engine::Engine;
use fleetbook::error::Error;
use fleetbook::server::serve;
use fleetbook::store::PgStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = PgStore::new(&config.database_url, config.max_connections).await?;

    let engine = Engine::new(store);

    serve(engine, config.bind_addr).await
}
