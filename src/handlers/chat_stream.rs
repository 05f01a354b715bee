// POST /api/chat/stream handler

use crate::models::{ErrorBody, StreamChatRequest};
use crate::upstream::AssistantBackend;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::Response;
use warp::Reply;

/// Relay a streamed chat call.
///
/// The backend body is passed through byte for byte; the relay does not split
/// or re-frame the NDJSON lines.
pub async fn chat_stream_handler(
    request: StreamChatRequest,
    backend: Arc<dyn AssistantBackend>,
) -> Result<Response, Infallible> {
    info!(thread_id = ?request.thread_id, "POST /api/chat/stream");

    let byte_stream = match backend.chat_stream(request).await {
        Ok(stream) => stream,
        Err(e) => {
            error!(upstream_status = ?e.status(), "Error in chat stream API: {}", e);
            let body = ErrorBody {
                status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                message: e.to_string(),
            };
            return Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response());
        }
    };

    let mut response = Response::new(Body::wrap_stream(byte_stream));
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Ok(response)
}
