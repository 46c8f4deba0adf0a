//! HTTP backend for WEPR.

pub mod error;
pub mod routes;

pub use error::ServerError;
pub use routes::{router, AppState};

use tokio::net::TcpListener;

/// Binds the HTTP listener. `host` may be an IP literal or a hostname.
///
/// # Errors
/// 当地址无法解析或端口被占用时返回错误。
pub async fn bind(host: &str, port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind((host, port)).await
}
