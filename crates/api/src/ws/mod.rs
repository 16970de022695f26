//! WebSocket push channel for agent consoles.
//!
//! Clients connect to `/api/v1/ws` and receive conversation change
//! notifications as JSON text frames.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
