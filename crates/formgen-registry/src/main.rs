//! Registry server binary.

use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use formgen_registry::{router, RegistryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4000);

    // Sharing feature, open to any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(RegistryStore::new()).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Registry listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
