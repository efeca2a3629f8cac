use simple_static_server::{Server, ServerConfig, ServerError, ShutdownSignal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

#[tokio::main]
async fn main() -> ExitCode {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_timer(LocalTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // --help 和 --version 由 clap 自己输出并退出
        Err(ServerError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::from_args(std::env::args_os())?;

    // 先注册信号，保证启动提示之后到达的信号都能被处理
    let signal = ShutdownSignal::register()?;
    let server = Server::bind(config).await?;

    println!("{}", server.banner());
    server.serve(signal.recv()).await?;
    Ok(())
}
