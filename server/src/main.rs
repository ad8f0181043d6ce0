//! Server binary: reads settings, prepares the store, serves the API.
//!
//! Run from repo root: `cargo run -p social-media-server`
//! Without a database: `STORE=memory cargo run -p social-media-server`

use social_media_api::{
    app, ensure_database_exists, ensure_schema, init_tracing, AppState, MemoryStore, PgStore, Settings, StoreKind,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init_tracing();

    let state = match settings.store {
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            AppState::in_memory(MemoryStore::new())
        }
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_schema(&pool, &settings.schema).await?;
            AppState::postgres(PgStore::new(pool, &settings.schema))
        }
    };

    let app = app(state, settings.body_limit);
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
