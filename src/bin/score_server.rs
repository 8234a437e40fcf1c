//! Score API server
//!
//! Serves `POST /api/save-score` backed by PostgreSQL (`POSTGRES_URL`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};
    use falling_catch::server::{self, PgScoreStore, ScoreStore, ServerConfig};

    pub async fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        log::info!("Starting Falling Catch score server");

        let config = ServerConfig::from_env()?;
        log::info!("Config: {:?}", config);

        let store = PgScoreStore::connect(&config)?;
        // The API still starts without the database; inserts then fail with 500s
        if let Err(e) = store.ensure_schema().await {
            log::warn!("Could not prepare player_score table: {}", e);
        }
        let store: Arc<dyn ScoreStore> = Arc::new(store);

        log::info!("Binding to {}", config.bind_address);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(86400);

            App::new()
                .wrap(cors)
                .wrap(middleware::Logger::default())
                .app_data(web::Data::from(store.clone()))
                .configure(server::configure)
        })
        .bind(&config.bind_address)?
        .run()
        .await?;

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The score server only runs natively
}
