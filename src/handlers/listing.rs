use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
};
use http::{HeaderValue, StatusCode, header};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// 链接中需要转义的字符
const HREF_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// 为没有 `index.html` 的目录生成列表页
///
/// 作为 `ServeDir` 的 fallback 使用：文件不存在、路径非法时都会走到这里，
/// 所以只有以 `/` 结尾、并且确实是根目录内的目录时才返回列表，其余一律 404。
///
/// # 参数
///
/// * `State(root)` - 文档根目录。
/// * `req` - HTTP 请求。
///
/// # 返回值
///
/// 目录列表页，或者 404 响应。
pub async fn list_directory(State(root): State<Arc<PathBuf>>, req: Request) -> Response {
    let request_path = req.uri().path();
    if !request_path.ends_with('/') {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Some(dir) = resolve_directory(&root, request_path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match render_listing(&dir, request_path).await {
        Ok(html) => {
            tracing::debug!(path = request_path, "generated directory listing");
            let mut response = Response::new(Body::from(html));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            );
            response
        }
        Err(e) => {
            tracing::warn!(path = request_path, error = %e, "cannot list directory");
            (StatusCode::NOT_FOUND, "No permission to list directory").into_response()
        }
    }
}

/// 把请求路径映射到根目录内的目录
///
/// 解码后的路径只能由普通路径段组成，`..`、绝对路径之类的一律拒绝。
fn resolve_directory(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
    let mut dir = root.to_path_buf();

    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => dir.push(segment),
            Component::CurDir => {}
            _ => return None,
        }
    }

    dir.is_dir().then_some(dir)
}

/// 生成 HTML 目录列表，条目按名称排序，子目录带 `/` 后缀
async fn render_listing(dir: &Path, request_path: &str) -> std::io::Result<String> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        // 指向目录的符号链接也当作目录
        if tokio::fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
        {
            name.push('/');
        }
        names.push(name);
    }
    names.sort_by_key(|name| name.to_lowercase());

    let title = escape_html(&percent_decode_str(request_path).decode_utf8_lossy());
    let mut html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Index of {title}</title></head>\n\
         <body><h1>Index of {title}</h1><hr><pre>\n"
    );

    if request_path != "/" {
        html.push_str("<a href=\"../\">../</a>\n");
    }

    for name in &names {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            utf8_percent_encode(name, HREF_ENCODE_SET),
            escape_html(name)
        ));
    }

    html.push_str("</pre><hr></body></html>\n");
    Ok(html)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
