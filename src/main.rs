use dramabox_api::api::DramaboxApi;
use dramabox_api::config::Config;
use dramabox_api::routes::{router, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志, RUST_LOG 未设置时使用 info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let config = Config::from_env()?;
    let api = DramaboxApi::new(config.api_base.clone());

    info!("📡 上游接口: {}", api.base_url());

    let app = router(AppState::new(Arc::new(api)));

    let addr = config.addr();
    info!("🚀 DramaBox API 启动在 http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
