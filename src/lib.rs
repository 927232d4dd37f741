//! 短剧目录聚合后端
//!
//! 从 DramaBox 上游的多个列表接口并发取数, 合并为详情页、播放页等页面视图。

pub mod aggregator;
pub mod api;
pub mod config;
pub mod http_client;
pub mod normalizer;
pub mod page_state;
pub mod routes;
pub mod types;
pub mod views;

#[cfg(test)]
mod test_support;
