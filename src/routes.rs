// Route definitions

use crate::handlers;
use crate::upstream::AssistantBackend;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

/// Largest request body the relay will read
const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub fn configure_routes(
    backend: Arc<dyn AssistantBackend>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let api = warp::path("api").and(warp::path("chat"));

    // POST /api/chat
    let chat = api
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_backend(backend.clone()))
        .and_then(handlers::chat_handler);

    // POST /api/chat/stream
    let chat_stream = api
        .and(warp::path("stream"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_backend(backend))
        .and_then(handlers::chat_stream_handler);

    // GET /health
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // Combine routes
    chat.or(chat_stream)
        .or(health)
        .recover(handlers::handle_rejection)
}

fn with_backend(
    backend: Arc<dyn AssistantBackend>,
) -> impl Filter<Extract = (Arc<dyn AssistantBackend>,), Error = Infallible> + Clone {
    warp::any().map(move || backend.clone())
}
