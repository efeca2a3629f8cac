//! MIME 类型解析模块
//!
//! 在标准的扩展名推断之前，先查询一张固定的覆盖表。
//! 覆盖表按扩展名（包含前导 `.`）做精确、区分大小写的匹配。

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::HashMap;

/// 无法推断时使用的默认 MIME 类型
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// 内置的覆盖条目
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[(".tgz", "application/x-gzip")];

/// MIME 覆盖表
///
/// 进程启动时构建一次，之后只读，可以在请求处理器之间通过 `Arc` 共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeOverrides {
    table: HashMap<String, String>,
}

impl MimeOverrides {
    /// 从 `(扩展名, MIME 类型)` 条目构建覆盖表
    ///
    /// 扩展名需要包含前导 `.`，例如 `".tgz"`。重复的扩展名以最后一个为准。
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: entries
                .into_iter()
                .map(|(ext, mime)| (ext.into(), mime.into()))
                .collect(),
        }
    }

    /// 按扩展名查找覆盖值
    pub fn get(&self, extension: &str) -> Option<&str> {
        self.table.get(extension).map(String::as_str)
    }

    /// 查找请求路径对应的覆盖 MIME 类型
    ///
    /// # 参数
    ///
    /// * `request_path` - 请求的 URL 路径，可以带查询串或片段
    ///
    /// # 返回值
    ///
    /// 扩展名命中覆盖表时返回覆盖值，否则返回 `None`
    pub fn lookup(&self, request_path: &str) -> Option<&str> {
        let path = decoded_path(request_path);
        self.get(extension_of(&path))
    }

    /// 解析请求路径的 MIME 类型
    ///
    /// 先查覆盖表，未命中时回退到 `mime_guess` 的推断结果，
    /// 什么都推断不出来时返回 [`DEFAULT_MIME_TYPE`]。
    /// 回退部分与 `ServeDir` 自己设置的 `Content-Type` 一致，
    /// 所以它就是实际响应头里的类型。
    ///
    /// # 参数
    ///
    /// * `request_path` - 请求的 URL 路径，可以带查询串或片段
    ///
    /// # 返回值
    ///
    /// MIME 类型字符串，永不失败
    pub fn resolve(&self, request_path: &str) -> String {
        let path = decoded_path(request_path);
        if let Some(mime) = self.get(extension_of(&path)) {
            return mime.to_string();
        }

        mime_guess::from_path(&*path)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string()
    }

    /// 覆盖条目的数量
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// 覆盖表是否为空
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for MimeOverrides {
    fn default() -> Self {
        Self::new(DEFAULT_OVERRIDES.iter().copied())
    }
}

/// 去掉查询串和片段，并做百分号解码
fn decoded_path(request_path: &str) -> Cow<'_, str> {
    let end = request_path
        .find(['?', '#'])
        .unwrap_or(request_path.len());
    percent_decode_str(&request_path[..end]).decode_utf8_lossy()
}

/// 获取路径最后一段中从最后一个 `.` 开始的扩展名
///
/// # 示例
///
/// ```
/// use simple_static_server::mime::extension_of;
///
/// assert_eq!(extension_of("/archive.tar.tgz"), ".tgz");
/// assert_eq!(extension_of("/dir.d/file"), "");
/// assert_eq!(extension_of("/README"), "");
/// ```
pub fn extension_of(path: &str) -> &str {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(pos) => &segment[pos..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/archive.tgz"), ".tgz");
        assert_eq!(extension_of("/archive.tar.tgz"), ".tgz");
        assert_eq!(extension_of("archive.tgz"), ".tgz");
        assert_eq!(extension_of("/.tgz"), ".tgz");
        assert_eq!(extension_of("/trailing."), ".");

        // 目录名里的点不算扩展名
        assert_eq!(extension_of("/streams.v1/index"), "");
        assert_eq!(extension_of("/"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_override_wins_regardless_of_prefix() {
        let overrides = MimeOverrides::default();

        for path in [
            "/archive.tgz",
            "/deep/nested/dir/images.tgz",
            "/archive.tar.tgz",
            "/archive.tgz?download=1",
            "/archive.tgz#top",
            "/archive%2Etgz",
        ] {
            assert_eq!(overrides.resolve(path), "application/x-gzip", "{path}");
        }
    }

    #[test]
    fn test_override_is_case_sensitive() {
        let overrides = MimeOverrides::default();

        assert_eq!(overrides.lookup("/ARCHIVE.TGZ"), None);
        assert_eq!(
            overrides.resolve("/ARCHIVE.TGZ"),
            mime_guess::from_path("/ARCHIVE.TGZ")
                .first_raw()
                .unwrap_or(DEFAULT_MIME_TYPE)
        );
    }

    #[test]
    fn test_fallback_matches_default_inference() {
        let overrides = MimeOverrides::default();

        for path in ["/index.html", "/notes.txt", "/style.css", "/data.json", "/a.gz"] {
            let expected = mime_guess::from_path(path)
                .first_raw()
                .unwrap_or(DEFAULT_MIME_TYPE);
            assert_eq!(overrides.resolve(path), expected, "{path}");
        }

        assert_eq!(overrides.resolve("/index.html"), "text/html");
        assert_eq!(overrides.resolve("/notes.txt"), "text/plain");
    }

    #[test]
    fn test_no_extension_falls_back() {
        let overrides = MimeOverrides::default();

        assert_eq!(overrides.lookup("/README"), None);
        assert_eq!(overrides.resolve("/README"), DEFAULT_MIME_TYPE);
        assert_eq!(overrides.resolve("/dir.tgz/README"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let overrides = MimeOverrides::default();

        assert_eq!(
            overrides.resolve("/streams/v1/com.ubuntu.juju.tgz"),
            overrides.resolve("/streams/v1/com.ubuntu.juju.tgz")
        );
        assert_eq!(overrides.resolve("/x.bin"), overrides.resolve("/x.bin"));
    }

    #[test]
    fn test_custom_table() {
        let overrides =
            MimeOverrides::new([(".sjson", "application/json"), (".tgz", "application/gzip")]);

        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.resolve("/index.sjson"), "application/json");
        assert_eq!(overrides.resolve("/a.tgz"), "application/gzip");
        assert!(MimeOverrides::new(Vec::<(String, String)>::new()).is_empty());
    }
}
