//! 静态文件服务器的配置模块。
//!
//! 配置只来自命令行：唯一的位置参数是要服务的目录，端口固定为 [`DEFAULT_PORT`]。

use crate::error::ServerError;
use crate::mime::MimeOverrides;
use clap::Parser;
use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// 监听端口
pub const DEFAULT_PORT: u16 = 8666;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(version, about = "Serve a directory over HTTP with custom MIME types")]
pub struct Cli {
    /// 作为文档根目录的路径
    pub directory: PathBuf,
}

/// 服务器配置
///
/// 启动时构建一次，显式传给 [`crate::server::Server::bind`]。
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub port: u16,
    pub mime_overrides: MimeOverrides,
}

impl ServerConfig {
    /// 使用默认端口和默认覆盖表创建配置
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            port: DEFAULT_PORT,
            mime_overrides: MimeOverrides::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// 从命令行参数解析配置
    ///
    /// # 参数
    ///
    /// * `args` - 完整的参数列表，第一个元素是程序名
    ///
    /// # 返回值
    ///
    /// 校验过根目录的配置；缺少参数时返回 [`ServerError::Cli`]，
    /// 目录不存在或不是目录时返回 [`ServerError::InvalidArgument`]
    pub fn from_args<I, T>(args: I) -> Result<Self, ServerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        let config = Self::new(cli.directory);
        config.validate()?;
        Ok(config)
    }

    /// 检查根目录是否是一个存在的目录
    pub fn validate(&self) -> Result<(), ServerError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ServerError::InvalidArgument(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Err(ServerError::InvalidArgument(format!(
                "cannot read {}: {e}",
                self.root.display()
            ))),
        }
    }

    /// 监听地址，绑定所有网卡
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
