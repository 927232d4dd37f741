//! 多数据源聚合
//! 并发请求所有列表数据源, 等待全部结束后按声明顺序合并、查找目标并去重

use crate::api::Catalog;
use crate::http_client::FetchError;
use crate::types::{Drama, Episode, Listing};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, warn};

/// 一次数据源调用
pub struct Source<'a> {
    pub name: &'static str,
    call: BoxFuture<'a, Result<Listing<Drama>, FetchError>>,
}

impl<'a> Source<'a> {
    pub fn new<F>(name: &'static str, call: F) -> Self
    where
        F: Future<Output = Result<Listing<Drama>, FetchError>> + Send + 'a,
    {
        Self {
            name,
            call: call.boxed(),
        }
    }
}

/// 详情页和播放页使用的数据源, 顺序决定去重时的优先级
pub fn drama_sources(catalog: &dyn Catalog) -> Vec<Source<'_>> {
    vec![
        Source::new("trending", catalog.trending()),
        Source::new("foryou", catalog.for_you()),
        Source::new("vip", catalog.vip()),
    ]
}

/// 聚合结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// 目标条目, 所有数据源中都没有时为 `None`
    pub found: Option<Drama>,
    pub related: Vec<Drama>,
}

/// 把单个数据源的结果落地: 失败转换为空列表
pub fn settle<T>(name: &str, result: Result<Listing<T>, FetchError>) -> Listing<T> {
    match result {
        Ok(listing) => {
            debug!("数据源 {} 返回 {} 个条目", name, listing.items.len());
            listing
        }
        Err(e) => {
            warn!("数据源 {} 失败: {}. 按空列表处理", name, e);
            Listing::failed()
        }
    }
}

/// 等待所有数据源结束
///
/// 任何一个数据源失败都不会取消或提前结束其它数据源; 返回顺序与声明顺序一致,
/// 与响应到达的先后无关。
pub async fn settle_all(sources: Vec<Source<'_>>) -> Vec<Listing<Drama>> {
    let names: Vec<&'static str> = sources.iter().map(|s| s.name).collect();
    let results = join_all(sources.into_iter().map(|s| s.call)).await;

    names
        .into_iter()
        .zip(results)
        .map(|(name, result)| settle(name, result))
        .collect()
}

/// 按声明顺序拼接
pub fn concat(listings: Vec<Listing<Drama>>) -> Vec<Drama> {
    listings.into_iter().flat_map(|l| l.items).collect()
}

/// 第一个 `bookId` 匹配的条目
pub fn find_target<'a>(items: &'a [Drama], target_id: &str) -> Option<&'a Drama> {
    items.iter().find(|d| d.book_id == target_id)
}

/// 按 `bookId` 去重, 保留第一次出现的条目
pub fn dedupe(items: &[Drama]) -> Vec<Drama> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|d| seen.insert(d.book_id.as_str()))
        .cloned()
        .collect()
}

/// 相关推荐: 去重、排除目标、截断
pub fn related(items: &[Drama], target_id: &str, limit: usize) -> Vec<Drama> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|d| seen.insert(d.book_id.as_str()))
        .filter(|d| d.book_id != target_id)
        .take(limit)
        .cloned()
        .collect()
}

/// 聚合多个数据源
pub async fn aggregate(
    target_id: &str,
    sources: Vec<Source<'_>>,
    related_limit: usize,
) -> Aggregation {
    let total = sources.len();
    let combined = concat(settle_all(sources).await);

    let found = find_target(&combined, target_id).cloned();
    let related = related(&combined, target_id, related_limit);

    info!(
        "聚合 {}: {} 个数据源, {} 个条目, 找到目标: {}, 相关 {} 个",
        target_id,
        total,
        combined.len(),
        found.is_some(),
        related.len()
    );

    Aggregation { found, related }
}

/// 单部短剧的完整数据
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DramaBundle {
    pub drama: Option<Drama>,
    pub episodes: Vec<Episode>,
    pub related: Vec<Drama>,
}

/// 同时获取剧集列表和列表数据源
///
/// 剧集列表与其它数据源在同一个屏障中等待, 任一方失败都不影响另一方。
pub async fn load_drama(catalog: &dyn Catalog, book_id: &str, related_limit: usize) -> DramaBundle {
    let (episodes, aggregation) = futures::join!(
        async { settle("allepisode", catalog.all_episodes(book_id).await) },
        aggregate(book_id, drama_sources(catalog), related_limit),
    );

    DramaBundle {
        drama: aggregation.found,
        episodes: episodes.items,
        related: aggregation.related,
    }
}
