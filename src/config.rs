//! 运行配置, 启动时从环境变量读取一次

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;

/// 上游接口的代理前缀
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5173/api/dramabox";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无效的上游地址 {value}: {source}")]
    InvalidApiBase {
        value: String,
        source: url::ParseError,
    },
    #[error("上游地址只支持 http/https: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `PORT`
    pub port: u16,
    /// `DRAMABOX_API_BASE`
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_base = lookup("DRAMABOX_API_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let parsed = Url::parse(&api_base).map_err(|source| ConfigError::InvalidApiBase {
            value: api_base.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(api_base));
        }

        Ok(Self { port, api_base })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
