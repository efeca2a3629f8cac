//! 服务器错误类型
//!
//! 启动阶段的错误都是致命的，会映射到进程退出码；
//! 单个请求的错误由文件服务转换成 HTTP 状态码，不会出现在这里。

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// 一般失败的退出码
pub const EXIT_FAILURE: u8 = 1;

/// 命令行用法错误的退出码，与 clap 保持一致
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, Error)]
pub enum ServerError {
    /// 命令行参数无法解析（包括 `--help` 和 `--version` 的输出）
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("address {addr} is already in use")]
    AddressInUse { addr: SocketAddr },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServerError {
    /// 绑定失败时根据错误类型区分端口被占用和其他错误
    pub fn bind(addr: SocketAddr, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AddrInUse {
            Self::AddressInUse { addr }
        } else {
            Self::Bind { addr, source }
        }
    }

    /// 获取对应的进程退出码
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Cli(err) => err.exit_code().clamp(0, u8::MAX as i32) as u8,
            Self::InvalidArgument(_)
            | Self::AddressInUse { .. }
            | Self::Bind { .. }
            | Self::Signal(_)
            | Self::Io(_) => EXIT_FAILURE,
        }
    }
}
