use anyhow::Result;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use tripchat_graph::CompiledGraph;

use crate::web::{routes, session_manager::SessionManager};

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
    pub logs_dir: Option<PathBuf>,
    pub model: String,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    session_manager: Arc<SessionManager>,
}

impl WebServer {
    pub fn new(config: WebServerConfig, app: CompiledGraph) -> Self {
        let session_manager = Arc::new(SessionManager::new(app, config.logs_dir.clone(), config.model.clone()));

        Self {
            config,
            session_manager,
        }
    }

    /// Router with CORS and request tracing layers
    pub fn router(&self) -> axum::Router {
        let app_state = routes::AppState {
            session_manager: Arc::clone(&self.session_manager),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(app_state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = self.router();

        println!("🌐 Web server starting on http://{}", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/sessions", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn session_manager(&self) -> Arc<SessionManager> {
        Arc::clone(&self.session_manager)
    }
}
