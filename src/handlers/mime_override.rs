use crate::mime::MimeOverrides;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderValue, header};
use std::sync::Arc;

/// 为命中覆盖表的请求改写 `Content-Type`
///
/// 文件服务本身按 `mime_guess` 推断类型；这里只在响应成功、
/// 且请求路径的扩展名在覆盖表中时替换该头部，其余响应原样返回。
///
/// # 参数
///
/// * `State(overrides)` - 只读的 MIME 覆盖表。
/// * `req` - HTTP 请求。
/// * `next` - 后续的处理链。
///
/// # 返回值
///
/// 可能被改写过 `Content-Type` 的响应。
pub async fn apply_mime_overrides(
    State(overrides): State<Arc<MimeOverrides>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let mut response = next.run(req).await;

    if !response.status().is_success() {
        return response;
    }

    if let Some(mime) = overrides.lookup(&path) {
        match HeaderValue::from_str(mime) {
            Ok(value) => {
                tracing::debug!(path = %path, content_type = mime, "applied mime override");
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            Err(e) => tracing::warn!(path = %path, error = %e, "invalid mime override"),
        }
    }

    response
}
