//! 测试用的内存数据源

use crate::api::Catalog;
use crate::http_client::FetchError;
use crate::types::{CdnMirror, Drama, Episode, Listing, VideoPath};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn drama(id: &str) -> Drama {
    Drama {
        book_id: id.to_string(),
        book_name: format!("Drama {}", id),
        ..Default::default()
    }
}

pub fn dramas(ids: &[&str]) -> Vec<Drama> {
    ids.iter().map(|id| drama(id)).collect()
}

pub fn episodes(count: u32) -> Vec<Episode> {
    (0..count)
        .map(|i| Episode {
            chapter_id: format!("c{}", i),
            chapter_index: i,
            chapter_name: format!("EP {}", i + 1),
            cdn_list: vec![CdnMirror {
                cdn_domain: "cdn.example.com".into(),
                is_default: 1,
                video_path_list: vec![
                    VideoPath {
                        quality: 540,
                        video_path: format!("https://cdn.example.com/{}-540.mp4", i),
                        ..Default::default()
                    },
                    VideoPath {
                        quality: 720,
                        video_path: format!("https://cdn.example.com/{}-720.mp4", i),
                        is_default: 1,
                        ..Default::default()
                    },
                ],
            }],
            ..Default::default()
        })
        .collect()
}

/// `None` 表示该接口请求失败
#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    pub for_you: Option<Vec<Drama>>,
    pub trending: Option<Vec<Drama>>,
    pub latest: Option<Vec<Drama>>,
    pub vip: Option<Vec<Drama>>,
    pub random: Option<Vec<Drama>>,
    pub search: Option<Vec<Drama>>,
    pub episodes: Option<Vec<Episode>>,
    /// 按页号 (从 1 开始) 索引
    pub dub_pages: Option<Vec<Vec<Drama>>>,
    pub keywords: Option<Vec<String>>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeCatalog {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, data: &Option<Vec<T>>) -> Result<Listing<T>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match data {
            Some(items) => Ok(Listing::new(items.clone())),
            None => Err(FetchError::Upstream { status: 503 }),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn for_you(&self) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.for_you)
    }

    async fn trending(&self) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.trending)
    }

    async fn latest(&self) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.latest)
    }

    async fn vip(&self) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.vip)
    }

    async fn random(&self) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.random)
    }

    async fn search(&self, _query: &str) -> Result<Listing<Drama>, FetchError> {
        self.respond(&self.search)
    }

    async fn all_episodes(&self, _book_id: &str) -> Result<Listing<Episode>, FetchError> {
        self.respond(&self.episodes)
    }

    async fn dub_indo(&self, _classify: &str, page: u32) -> Result<Listing<Drama>, FetchError> {
        let page_items = self.dub_pages.as_ref().map(|pages| {
            pages
                .get(page.saturating_sub(1) as usize)
                .cloned()
                .unwrap_or_default()
        });
        self.respond(&page_items)
    }

    async fn popular_search(&self) -> Result<Listing<String>, FetchError> {
        self.respond(&self.keywords)
    }
}
