// Handlers module

pub mod chat;
pub mod chat_stream;
pub mod health;
pub mod rejection;

pub use chat::chat_handler;
pub use chat_stream::chat_stream_handler;
pub use health::health_handler;
pub use rejection::handle_rejection;
