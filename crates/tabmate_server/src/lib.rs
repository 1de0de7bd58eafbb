//! TabMate HTTP service: configuration, application state and routes.
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ConfigError, FetchConfig, LlmConfig, ServerConfig};
pub use error::ApiError;
pub use routes::{cors_layer, router};
pub use state::{AppState, StartupError};
