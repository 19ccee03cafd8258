use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

use notes_hub::config::{Args, BackendKind};
use notes_hub::routes::{self, authentication::AuthSettings};
use notes_hub::store::Store;

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    let config = Args::new()?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_filter());

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = match config.backend {
        BackendKind::Postgres => Store::new(&config.db_url()).await?,
        BackendKind::Memory => Store::in_memory(),
    };
    let settings = AuthSettings::new(&config.token_key, config.admin_emails())?;

    let routes = routes::build(store, settings);

    info!(port = config.port, backend = ?config.backend, "notes_hub listening");
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
