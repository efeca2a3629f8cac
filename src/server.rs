//! HTTP 服务器
//!
//! `Server::bind` 绑定监听端口进入运行状态，`Server::serve` 一直运行到关闭信号到达。
//! `serve` 会消耗 `Server`，返回后监听套接字已经释放。

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handlers;
use crate::signal::ShutdownReason;
use axum::handler::Handler;
use axum::middleware;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// 创建并配置Axum应用程序
///
/// - 所有路径都交给 `ServeDir` 处理，根目录为 `config.root`
/// - 没有 `index.html` 的目录返回目录列表
/// - MIME 覆盖中间件在响应返回前改写 `Content-Type`
/// - 请求追踪中间件
///
/// # 参数
///
/// * `config` - 服务器配置。
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(config: &ServerConfig) -> axum::Router {
    let overrides = Arc::new(config.mime_overrides.clone());
    let listing = handlers::list_directory.with_state(Arc::new(config.root.clone()));

    axum::Router::new()
        .fallback_service(ServeDir::new(&config.root).fallback(listing))
        .layer(middleware::from_fn_with_state(
            overrides,
            handlers::apply_mime_overrides,
        ))
        .layer(TraceLayer::new_for_http())
}

/// 已绑定端口、正在运行的服务器
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// 在所有网卡上绑定配置的端口
    ///
    /// # 返回值
    ///
    /// 端口被占用时返回 [`ServerError::AddressInUse`]
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.listen_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::bind(addr, e))?;

        tracing::info!(%addr, root = %config.root.display(), "listener bound");
        Ok(Self { listener, config })
    }

    /// 实际监听的地址，端口为 0 时可以用来获取分配到的端口
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// 启动时打印到控制台的提示
    pub fn banner(&self) -> String {
        let port = self
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or(self.config.port);
        format!(
            "Serving on port {port} directory {}",
            self.config.root.display()
        )
    }

    /// 处理请求直到 `shutdown` 完成
    ///
    /// 关闭信号到达后打印关闭提示，停止接受新连接，
    /// 等正在处理的请求结束后才返回。
    ///
    /// # 参数
    ///
    /// * `shutdown` - 完成时给出关闭原因的 future。
    ///
    /// # 返回值
    ///
    /// 关闭原因；服务循环出现 I/O 错误时返回 [`ServerError::Io`]
    pub async fn serve<F>(self, shutdown: F) -> Result<ShutdownReason, ServerError>
    where
        F: Future<Output = ShutdownReason> + Send + 'static,
    {
        let (reason_tx, reason_rx) = oneshot::channel();
        let signal = async move {
            let reason = shutdown.await;
            println!("{}", reason.notice());
            tracing::info!(%reason, "graceful shutdown started");
            let _ = reason_tx.send(reason);
        };

        let router = app(&self.config);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(signal)
            .await?;

        // 服务循环只会在关闭信号到达后正常返回
        let reason = reason_rx.await.unwrap_or(ShutdownReason::Requested);
        tracing::info!(%reason, "server stopped");
        Ok(reason)
    }
}
