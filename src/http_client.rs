use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36 (DramaBox API)";

/// 全局 HTTP 客户端, 超时沿用传输层默认值
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to create HTTP client")
});

#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS、连接重置、超时等传输层错误
    #[error("网络请求失败: {0}")]
    Network(String),
    #[error("上游响应异常状态码: {status}")]
    Upstream { status: u16 },
    #[error("响应 JSON 解析失败: {0}")]
    Decode(String),
}

/// GET 请求并返回 JSON
///
/// 只尝试一次, 失败时先记录日志再把错误交给调用方。
pub async fn get_json(url: &str) -> Result<Value, FetchError> {
    let result = request_json(url).await;
    match &result {
        Ok(_) => debug!("请求完成: {}", url),
        Err(e) => warn!("请求 {} 失败: {}", url, e),
    }
    result
}

async fn request_json(url: &str) -> Result<Value, FetchError> {
    let response = HTTP_CLIENT
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(FetchError::Upstream {
            status: response.status().as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
}
