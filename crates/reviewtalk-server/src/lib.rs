//! ReviewTalk server — HTTP and WebSocket chat gateway.

pub mod connections;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
