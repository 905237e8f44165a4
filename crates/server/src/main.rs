mod error;
mod routes;

use std::env;

use db::DBService;
use services::services::storage::ImageStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub images: ImageStore,
}

struct Config {
    host: String,
    port: u16,
    database_url: String,
    asset_root: String,
    signing_key: String,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse()?,
            Err(_) => 3001,
        };
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:contractor.db".to_string()),
            asset_root: env::var("ASSET_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            // An ephemeral key means signed URLs stop working across
            // restarts; set URL_SIGNING_KEY in production.
            signing_key: env::var("URL_SIGNING_KEY")
                .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = DBService::new(&config.database_url).await?;
    let images = ImageStore::new(&config.asset_root, config.signing_key.as_bytes());

    let state = AppState { db, images };
    let app = routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
