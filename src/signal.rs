//! 信号处理模块
//!
//! - SIGTERM: 优雅关闭
//! - SIGINT:  优雅关闭 (Ctrl+C)
//!
//! 监听器在服务器开始接受连接之前注册，之后到达的信号都会走优雅关闭流程。

use crate::error::ServerError;
use std::fmt;

/// 触发关闭的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGTERM
    Terminate,
    /// SIGINT / Ctrl+C
    Interrupt,
    /// 由调用方通过其他方式请求
    Requested,
}

impl ShutdownReason {
    /// 关闭时打印到控制台的提示
    pub fn notice(self) -> &'static str {
        match self {
            Self::Terminate => "SIGTERM, shutting down.",
            Self::Interrupt => "SIGINT, shutting down.",
            Self::Requested => "Shutdown requested, shutting down.",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Terminate => "SIGTERM",
            Self::Interrupt => "SIGINT",
            Self::Requested => "request",
        })
    }
}

/// 已注册的终止信号监听器
#[cfg(unix)]
pub struct ShutdownSignal {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl ShutdownSignal {
    /// 注册 SIGTERM 和 SIGINT 监听器
    ///
    /// 必须在 tokio 运行时中调用。
    pub fn register() -> Result<Self, ServerError> {
        use tokio::signal::unix::{SignalKind, signal};

        let terminate = signal(SignalKind::terminate()).map_err(ServerError::Signal)?;
        let interrupt = signal(SignalKind::interrupt()).map_err(ServerError::Signal)?;
        tracing::debug!("registered SIGTERM and SIGINT handlers");

        Ok(Self {
            terminate,
            interrupt,
        })
    }

    /// 等待第一个到达的信号
    pub async fn recv(mut self) -> ShutdownReason {
        tokio::select! {
            _ = self.terminate.recv() => ShutdownReason::Terminate,
            _ = self.interrupt.recv() => ShutdownReason::Interrupt,
        }
    }
}

/// Windows 只支持 Ctrl+C
#[cfg(windows)]
pub struct ShutdownSignal {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl ShutdownSignal {
    pub fn register() -> Result<Self, ServerError> {
        let ctrl_c = tokio::signal::windows::ctrl_c().map_err(ServerError::Signal)?;
        Ok(Self { ctrl_c })
    }

    pub async fn recv(mut self) -> ShutdownReason {
        self.ctrl_c.recv().await;
        ShutdownReason::Interrupt
    }
}
