//! 静态文件服务器库
//!
//! 这是一个基于Axum的静态文件服务器，主要功能包括：
//! - 从本地目录服务静态文件
//! - 按扩展名覆盖 MIME 类型（`.tgz` 以 `application/x-gzip` 返回）
//! - 收到 SIGTERM 或 SIGINT 时优雅关闭

pub mod config;
pub mod error;
pub mod handlers;
pub mod mime;
pub mod server;
pub mod signal;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::ServerError;
pub use mime::MimeOverrides;
pub use server::{Server, app};
pub use signal::{ShutdownReason, ShutdownSignal};
