// POST /api/chat handler

use crate::models::{ChatEnvelope, ChatRequest};
use crate::upstream::AssistantBackend;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};

/// Forward a buffered chat call.
///
/// Backend failures never surface as HTTP errors here: the caller always gets
/// a 200 carrying either the backend's JSON or a failure envelope.
pub async fn chat_handler(
    request: ChatRequest,
    backend: Arc<dyn AssistantBackend>,
) -> Result<impl warp::Reply, Infallible> {
    info!(thread_id = ?request.thread_id, "POST /api/chat");

    match backend.chat(request).await {
        Ok(data) => Ok(warp::reply::json(&data)),
        Err(e) => {
            error!(upstream_status = ?e.status(), "Error in chat API: {}", e);
            Ok(warp::reply::json(&ChatEnvelope::failure(e.to_string())))
        }
    }
}
