//! HTTP请求处理模块
//!
//! 文件读取、路径解析和目录穿越防护交给 `tower_http::services::ServeDir`，
//! 这里只包含在它外层工作的中间件，以及没有 `index.html` 时的目录列表。

pub mod listing;
pub mod mime_override;

pub use listing::list_directory;
pub use mime_override::apply_mime_overrides;
