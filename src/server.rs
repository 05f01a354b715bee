//! Binding the relay routes to a listen address

use crate::config::RelayConfig;
use crate::routes::configure_routes;
use crate::upstream::AssistantBackend;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Bind the relay to `config.bind_addr`
///
/// Returns the bound address and the server future, which completes once
/// `shutdown` resolves and in-flight requests have finished.
///
/// # Errors
///
/// Fails when the address cannot be bound, e.g. because it is already in use.
pub fn bind_relay(
    config: &RelayConfig,
    backend: Arc<dyn AssistantBackend>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()>), warp::Error> {
    let routes = configure_routes(backend);
    warp::serve(routes).try_bind_with_graceful_shutdown(config.bind_addr, shutdown)
}
