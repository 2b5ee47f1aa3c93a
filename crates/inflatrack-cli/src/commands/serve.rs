//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use inflatrack_server::{AppState, ServerConfig};

use super::{load_config, open_source};

pub async fn cmd_serve(
    data: Option<&Path>,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let reference = config
        .country_reference()
        .context("Failed to load country reference")?;
    let source = open_source(&config, data)?;
    let server = ServerConfig::from_env(&config);

    println!("🚀 Starting inflatrack web server...");
    println!("   Source: {}", source.name());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Cache TTL: {}s", server.ttl.num_seconds());
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    if server.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only (set INFLATRACK_ALLOWED_ORIGINS to allow others)");
    } else {
        println!("   🌐 CORS: {}", server.allowed_origins.join(", "));
    }
    println!();

    let state = Arc::new(AppState::new(source, reference, config, server));
    let static_dir = static_dir.and_then(|d| d.to_str());

    inflatrack_server::serve(state, host, port, static_dir)
        .await
        .context("Server error")
}
