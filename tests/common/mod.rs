#![allow(dead_code)]

use assistant_relay::{configure_routes, HttpBackend, RelayConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::Response;
use warp::{Filter, Reply};

/// Thread id the fake backend hands out for buffered calls
pub const BUFFERED_THREAD_ID: &str = "thread-abc";
/// Thread id the fake backend hands out for streamed calls
pub const STREAM_THREAD_ID: &str = "thread-xyz";

/// Message that makes the fake backend answer with an error status
pub const FAIL_MESSAGE: &str = "fail";
/// Message that makes the fake backend answer with a failure envelope
pub const REJECT_MESSAGE: &str = "reject";

/// NDJSON body the fake backend streams for `thread_id`
pub fn stream_body(thread_id: &str) -> String {
    let lines = [
        json!({"status": true, "message": "streaming", "data": {"answer": "Hel", "thread_id": thread_id, "is_complete": false}}),
        json!({"status": true, "message": "streaming", "data": {"answer": "lo", "thread_id": thread_id, "is_complete": false}}),
    ];
    let complete = json!({"status": true, "message": "complete", "data": {"answer": "Hello", "thread_id": thread_id, "is_complete": true, "processing_time": 0.25}});

    format!(
        "{}\n{}\nnot-a-chunk\n\n{}\n",
        lines[0], lines[1], complete
    )
}

fn fake_chat(body: Value) -> Response {
    let message = body["message"].as_str().unwrap_or_default();
    if message == FAIL_MESSAGE {
        return warp::reply::with_status("backend down", StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    if message == REJECT_MESSAGE {
        return warp::reply::json(&json!({
            "success": 0,
            "code": "404",
            "message": "Thread not found",
            "data": null
        }))
        .into_response();
    }

    let thread_id = body["threadId"]
        .as_str()
        .unwrap_or(BUFFERED_THREAD_ID)
        .to_string();
    warp::reply::json(&json!({
        "success": 1,
        "code": "0",
        "message": "ok",
        "data": {
            "threadId": thread_id,
            "answer": format!("echo: {}", message),
            "receivedThreadId": body["threadId"].clone()
        }
    }))
    .into_response()
}

fn fake_chat_stream(body: Value) -> Response {
    let message = body["message"].as_str().unwrap_or_default();
    if message == FAIL_MESSAGE {
        return warp::reply::with_status("backend down", StatusCode::SERVICE_UNAVAILABLE)
            .into_response();
    }

    let thread_id = body["thread_id"].as_str().unwrap_or(STREAM_THREAD_ID);
    // small pieces so lines straddle transport chunks
    let chunks: Vec<Result<Vec<u8>, std::io::Error>> = stream_body(thread_id)
        .into_bytes()
        .chunks(7)
        .map(|c| Ok(c.to_vec()))
        .collect();

    let mut response = Response::new(Body::wrap_stream(futures::stream::iter(chunks)));
    response.headers_mut().insert(
        "content-type",
        warp::http::HeaderValue::from_static("application/x-ndjson"),
    );
    response
}

/// Start a fake assistant backend on an ephemeral port
pub fn spawn_fake_backend() -> SocketAddr {
    let chat = warp::path!("assistant" / "chat")
        .and(warp::post())
        .and(warp::body::json())
        .map(fake_chat);

    let chat_stream = warp::path!("assistant" / "chat" / "stream")
        .and(warp::post())
        .and(warp::body::json())
        .map(fake_chat_stream);

    let (addr, server) = warp::serve(chat.or(chat_stream)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// Backend client pointed at a fake backend
pub fn http_backend(backend_addr: SocketAddr) -> HttpBackend {
    let config = RelayConfig::new(format!("http://{}", backend_addr));
    HttpBackend::new(&config).expect("Failed to build HTTP backend")
}

/// Start the relay on an ephemeral port in front of `backend_addr`
pub fn spawn_relay(backend_addr: SocketAddr) -> SocketAddr {
    let routes = configure_routes(Arc::new(http_backend(backend_addr)));
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// Fake backend plus relay, returning the relay's base URL
pub fn spawn_stack() -> String {
    let backend_addr = spawn_fake_backend();
    let relay_addr = spawn_relay(backend_addr);
    format!("http://{}", relay_addr)
}
