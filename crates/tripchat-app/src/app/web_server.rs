use anyhow::{Context, Result};
use std::net::SocketAddr;

use tripchat_graph::CompiledGraph;

use crate::config::AppConfig;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web server
pub async fn run_web_server(config: &AppConfig, app: CompiledGraph, bind: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    println!("🌐 Starting TripChat web server...");
    println!("   Address: {}", addr);
    println!("   Model: {}", config.model_label());

    let server = WebServer::new(
        WebServerConfig {
            bind_addr: addr,
            logs_dir: config.logs_dir.clone(),
            model: config.model_label(),
        },
        app,
    );
    server.start().await
}
