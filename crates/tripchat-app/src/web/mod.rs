// Web frontend module
pub mod protocol;
pub mod routes;
pub mod server;
pub mod session_manager;

pub use protocol::{ChatMessageView, SessionInfo};
pub use server::WebServer;
pub use session_manager::{SessionId, SessionManager};
