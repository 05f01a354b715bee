// Configuration
pub mod config;

// HTTP relay modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

// Assistant backend access
pub mod upstream;

// Caller-side wrappers for the relay endpoints
pub mod client;

pub use config::{ConfigError, RelayConfig};
pub use routes::configure_routes;
pub use server::bind_relay;
pub use upstream::{AssistantBackend, HttpBackend, UpstreamError};
