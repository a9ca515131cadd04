use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use tokio::sync::Mutex;

use leekmate::routes;
use leekmate::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // Begin logger
    env_logger::init();

    dotenv().ok();
    let db_path = env::var("LEEKMATE_DB").unwrap_or_else(|_| String::from("leekmate.db"));
    let addr = env::var("LEEKMATE_ADDR").unwrap_or_else(|_| String::from("0.0.0.0:3000"));

    let store = Store::open(&db_path)
        .with_context(|| format!("Could not open database at {db_path}"))?;

    let app = routes::router(Arc::new(Mutex::new(store)));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Could not bind to {addr}"))?;

    log::info!("leekmate listening on {addr} (database: {db_path})");
    axum::serve(listener, app).await.context("Server error.")?;

    Ok(())
}
