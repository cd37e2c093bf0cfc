//! ReviewTalk Core — error taxonomy and process-level configuration.

pub mod config;
pub mod error;

pub use config::ServerConfig;
pub use error::{Error, Result};
