//! 页面视图模型
//! 每个页面一个结构体, 只包含展示所需的数据和判断

use crate::aggregator::{load_drama, settle, settle_all, Source};
use crate::api::{Catalog, DEFAULT_CLASSIFY};
use crate::page_state::{RouteGuard, RouteToken};
use crate::types::{Drama, Episode, Listing, DEFAULT_QUALITY};
use serde::Serialize;
use tracing::{debug, info};

/// 详情页相关推荐数量
pub const DETAIL_RELATED_LIMIT: usize = 10;
/// 播放页相关推荐数量
pub const WATCH_RELATED_LIMIT: usize = 6;
/// 首页轮播最多使用的热门条目数
pub const HERO_LIMIT: usize = 5;
/// 返回条目数达到一整页时认为还有下一页
pub const DUB_PAGE_SIZE: usize = 10;

pub const DEFAULT_TITLE: &str = "Drama";
pub const NO_SYNOPSIS: &str = "Tidak ada sinopsis tersedia.";

/// 热搜接口不可用时的内置关键词
pub const POPULAR_KEYWORDS: [&str; 10] = [
    "Mafia",
    "CEO",
    "Balas Dendam",
    "Cinta Terlarang",
    "Pembalikan Identitas",
    "Terlahir Kembali",
    "Dewa Perang",
    "Pernikahan Kontrak",
    "Ibu Tunggal",
    "Serangan Balik",
];

/// 配音目录的分类
pub const DUB_CLASSIFY_OPTIONS: [(&str, &str); 3] = [
    ("terpopuler", "Terpopuler"),
    ("terbaru", "Terbaru"),
    ("selesai", "Selesai"),
];

/// 首页
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub hero: Vec<Drama>,
    pub for_you: Vec<Drama>,
    pub trending: Vec<Drama>,
    pub latest: Vec<Drama>,
    pub vip: Vec<Drama>,
}

impl HomeView {
    pub async fn fetch(catalog: &dyn Catalog) -> Self {
        let sources = vec![
            Source::new("foryou", catalog.for_you()),
            Source::new("trending", catalog.trending()),
            Source::new("latest", catalog.latest()),
            Source::new("vip", catalog.vip()),
        ];

        let mut sections = settle_all(sources).await.into_iter().map(|l| l.items);
        let for_you = sections.next().unwrap_or_default();
        let trending = sections.next().unwrap_or_default();
        let latest = sections.next().unwrap_or_default();
        let vip = sections.next().unwrap_or_default();

        info!(
            "首页数据: foryou {}, trending {}, latest {}, vip {}",
            for_you.len(),
            trending.len(),
            latest.len(),
            vip.len()
        );

        Self {
            hero: trending.iter().take(HERO_LIMIT).cloned().collect(),
            for_you,
            trending,
            latest,
            vip,
        }
    }
}

/// 轮播的下一个位置
pub fn next_hero_index(current: usize, trending_len: usize) -> usize {
    let span = trending_len.min(HERO_LIMIT);
    if span == 0 {
        0
    } else {
        (current + 1) % span
    }
}

/// 单一列表页 (最新、随机)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListView {
    pub dramas: Vec<Drama>,
}

impl ListView {
    pub fn from_listing(listing: Listing<Drama>) -> Self {
        Self {
            dramas: listing.items,
        }
    }
}

/// 搜索页
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub query: String,
    pub searched: bool,
    pub results: Vec<Drama>,
    /// 只有实际搜索过且没有结果时才为 true
    pub not_found: bool,
}

impl SearchView {
    /// 空白关键词不发起请求
    pub async fn fetch(catalog: &dyn Catalog, query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            return Self::default();
        }

        let results = settle("search", catalog.search(query).await).items;
        debug!("搜索 {}: {} 个结果", query, results.len());

        Self {
            query: query.to_string(),
            searched: true,
            not_found: results.is_empty(),
            results,
        }
    }
}

/// 热搜关键词, 接口失败或为空时使用内置列表
pub async fn popular_keywords(catalog: &dyn Catalog) -> Vec<String> {
    let keywords = settle("populersearch", catalog.popular_search().await).items;
    if keywords.is_empty() {
        POPULAR_KEYWORDS.iter().map(|k| k.to_string()).collect()
    } else {
        keywords
    }
}

/// 配音目录的一次分页请求
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub token: RouteToken,
    pub classify: String,
    pub page: u32,
    /// 第一页替换已有列表, 其余页追加
    pub reset: bool,
}

/// 配音目录的分页列表
///
/// 分页之间不去重。切换分类会使进行中的请求失效。
#[derive(Debug)]
pub struct DubIndoFeed {
    classify: String,
    page: u32,
    dramas: Vec<Drama>,
    has_more: bool,
    guard: RouteGuard,
}

impl Default for DubIndoFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFY)
    }
}

impl DubIndoFeed {
    pub fn new(classify: &str) -> Self {
        Self {
            classify: classify.to_string(),
            page: 0,
            dramas: Vec::new(),
            has_more: true,
            guard: RouteGuard::new(),
        }
    }

    pub fn classify(&self) -> &str {
        &self.classify
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn dramas(&self) -> &[Drama] {
        &self.dramas
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// 切换分类并从第一页重新开始
    pub fn select(&mut self, classify: &str) -> PageRequest {
        self.classify = classify.to_string();
        self.page = 1;
        self.dramas.clear();
        self.has_more = true;

        PageRequest {
            token: self.guard.navigate(),
            classify: self.classify.clone(),
            page: 1,
            reset: true,
        }
    }

    /// 加载更多
    pub fn next_page(&mut self) -> PageRequest {
        if self.page == 0 {
            let classify = self.classify.clone();
            return self.select(&classify);
        }

        self.page += 1;
        PageRequest {
            token: self.guard.current(),
            classify: self.classify.clone(),
            page: self.page,
            reset: false,
        }
    }

    /// 应用一页结果; 请求已过期时返回 false
    ///
    /// 请求失败时保留已有列表和 `has_more`。
    pub fn apply(&mut self, request: &PageRequest, listing: Listing<Drama>) -> bool {
        if !self.guard.is_current(request.token) {
            debug!(
                "丢弃过期的配音目录结果: {} 第 {} 页",
                request.classify, request.page
            );
            return false;
        }

        if !listing.ok && listing.items.is_empty() {
            return true;
        }

        self.has_more = has_more(listing.items.len());
        if request.reset {
            self.dramas = listing.items;
        } else {
            self.dramas.extend(listing.items);
        }
        true
    }

    pub async fn fetch(catalog: &dyn Catalog, request: &PageRequest) -> Listing<Drama> {
        settle(
            "dubindo",
            catalog.dub_indo(&request.classify, request.page).await,
        )
    }

    /// 请求并应用
    pub async fn load(&mut self, catalog: &dyn Catalog, request: PageRequest) -> bool {
        let listing = Self::fetch(catalog, &request).await;
        self.apply(&request, listing)
    }
}

/// 单页配音目录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DubIndoPageView {
    pub classify: String,
    pub page: u32,
    pub dramas: Vec<Drama>,
    pub has_more: bool,
}

impl DubIndoPageView {
    pub async fn fetch(catalog: &dyn Catalog, classify: &str, page: u32) -> Self {
        let page = page.max(1);
        let dramas = settle("dubindo", catalog.dub_indo(classify, page).await).items;
        Self {
            classify: classify.to_string(),
            page,
            has_more: has_more(dramas.len()),
            dramas,
        }
    }
}

/// 上一页是否是满页
pub fn has_more(returned: usize) -> bool {
    returned >= DUB_PAGE_SIZE
}

/// 角标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub name: String,
    /// 为空时使用主题色
    pub color: Option<String>,
}

fn badge_of(drama: &Drama) -> Option<Badge> {
    drama.corner.as_ref().map(|corner| Badge {
        name: corner.name.clone(),
        color: corner.badge_color().map(str::to_string),
    })
}

fn title_of(drama: Option<&Drama>) -> String {
    drama
        .map(|d| d.book_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn synopsis_of(drama: Option<&Drama>) -> String {
    drama
        .and_then(|d| d.introduction.as_deref())
        .filter(|intro| !intro.is_empty())
        .unwrap_or(NO_SYNOPSIS)
        .to_string()
}

/// 详情页
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub book_id: String,
    pub found: bool,
    pub title: String,
    pub cover_image: String,
    pub badge: Option<Badge>,
    pub tags: Vec<String>,
    pub synopsis: String,
    /// `chapterCount`, 缺失时使用剧集列表长度
    pub episode_count: usize,
    pub total_episodes: usize,
    pub play_count: Option<String>,
    pub watch_path: String,
    pub drama: Option<Drama>,
    pub related: Vec<Drama>,
}

impl DetailView {
    pub async fn fetch(catalog: &dyn Catalog, book_id: &str) -> Self {
        let bundle = load_drama(catalog, book_id, DETAIL_RELATED_LIMIT).await;
        let drama = bundle.drama.as_ref();

        let episode_count = drama
            .and_then(|d| d.chapter_count)
            .filter(|&count| count > 0)
            .map(|count| count as usize)
            .unwrap_or(bundle.episodes.len());

        Self {
            book_id: book_id.to_string(),
            found: drama.is_some(),
            title: title_of(drama),
            cover_image: drama.map(|d| d.cover_image().to_string()).unwrap_or_default(),
            badge: drama.and_then(badge_of),
            tags: drama.map(|d| d.tag_list().to_vec()).unwrap_or_default(),
            synopsis: synopsis_of(drama),
            episode_count,
            total_episodes: bundle.episodes.len(),
            play_count: drama
                .and_then(|d| d.play_count.clone())
                .filter(|p| !p.is_empty()),
            watch_path: format!("/watch/{}/0", book_id),
            related: bundle.related,
            drama: bundle.drama,
        }
    }
}

/// 剧集导航
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeNav {
    /// 路由序号无法解析时为 `None`
    pub index: Option<usize>,
    pub total: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl EpisodeNav {
    pub fn new(index: Option<usize>, total: usize) -> Self {
        Self {
            index,
            total,
            has_next: index.is_some_and(|i| i < total.saturating_sub(1)),
            has_prev: index.is_some_and(|i| i > 0),
        }
    }

    pub fn next(&self) -> Option<usize> {
        self.index
            .filter(|_| self.has_next)
            .and_then(|i| i.checked_add(1))
    }

    pub fn prev(&self) -> Option<usize> {
        self.index
            .filter(|_| self.has_prev)
            .and_then(|i| i.checked_sub(1))
    }
}

/// 剧集按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeButton {
    pub index: usize,
    pub chapter_id: String,
    pub label: String,
    pub active: bool,
}

/// 路由中的剧集序号
///
/// 取开头的十进制数字 (`"3abc"` 为 3)。没有数字、负数或超出 `usize` 时为
/// `None`, 此时不播放任何剧集。
pub fn parse_episode_index(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

/// 播放页
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchView {
    pub book_id: String,
    pub title: String,
    pub synopsis: String,
    pub detail_path: String,
    pub navigation: EpisodeNav,
    pub next_path: Option<String>,
    pub prev_path: Option<String>,
    /// 序号超出范围时为 `None`
    pub episode: Option<Episode>,
    pub video_url: String,
    pub quality: u32,
    pub qualities: Vec<u32>,
    pub episodes: Vec<EpisodeButton>,
    pub related: Vec<Drama>,
}

impl WatchView {
    pub async fn fetch(
        catalog: &dyn Catalog,
        book_id: &str,
        index: Option<usize>,
        quality: Option<u32>,
    ) -> Self {
        let bundle = load_drama(catalog, book_id, WATCH_RELATED_LIMIT).await;
        Self::build(book_id, index, quality, bundle.drama, bundle.episodes, bundle.related)
    }

    pub fn build(
        book_id: &str,
        index: Option<usize>,
        quality: Option<u32>,
        drama: Option<Drama>,
        episodes: Vec<Episode>,
        related: Vec<Drama>,
    ) -> Self {
        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        let navigation = EpisodeNav::new(index, episodes.len());
        let episode = index.and_then(|i| episodes.get(i)).cloned();

        let buttons = episodes
            .iter()
            .enumerate()
            .map(|(i, ep)| EpisodeButton {
                index: i,
                chapter_id: ep.chapter_id.clone(),
                label: (i + 1).to_string(),
                active: index == Some(i),
            })
            .collect();

        let path = |i: usize| format!("/watch/{}/{}", book_id, i);

        Self {
            book_id: book_id.to_string(),
            title: title_of(drama.as_ref()),
            synopsis: synopsis_of(drama.as_ref()),
            detail_path: format!("/drama/{}", book_id),
            next_path: navigation.next().map(path),
            prev_path: navigation.prev().map(path),
            navigation,
            video_url: episode
                .as_ref()
                .map(|ep| ep.video_url(quality).to_string())
                .unwrap_or_default(),
            qualities: episode
                .as_ref()
                .map(Episode::available_qualities)
                .unwrap_or_else(|| vec![DEFAULT_QUALITY]),
            quality,
            episode,
            episodes: buttons,
            related,
        }
    }
}
