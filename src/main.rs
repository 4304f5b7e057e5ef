mod db;
mod fetcher;
mod models;
mod render;
mod routes;
mod state;
mod viewmodel;

use db::Database;
use log::{error, info};
use routes::AppState;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    // Initialize database
    let database = match Database::new().await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };

    let app = routes::build_router(AppState { database });

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind_addr, e);
            return;
        }
    };
    info!("Awards results site listening on {}", bind_addr);

    if let Err(why) = axum::serve(listener, app).await {
        error!("Server error: {:?}", why);
    }
}
