//! HTTP 路由
//! 每个页面对应一个只读 JSON 接口

use crate::aggregator::settle;
use crate::api::{Catalog, DEFAULT_CLASSIFY};
use crate::views::{
    parse_episode_index, popular_keywords, DetailView, DubIndoPageView, HomeView, ListView,
    SearchView, WatchView, DUB_CLASSIFY_OPTIONS,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }
}

pub fn router(state: AppState) -> Router {
    // CORS 配置, 所有接口只读
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/home", get(home_handler))
        .route("/latest", get(latest_handler))
        .route("/random", get(random_handler))
        .route("/search", get(search_handler))
        .route("/populersearch", get(popular_search_handler))
        .route("/dubindo", get(dub_indo_handler))
        .route("/drama/{book_id}", get(drama_handler))
        .route("/watch/{book_id}/{episode_index}", get(watch_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// GET / - 接口信息
async fn index_handler() -> impl IntoResponse {
    let classify: Vec<_> = DUB_CLASSIFY_OPTIONS
        .iter()
        .map(|(value, label)| json!({ "value": value, "label": label }))
        .collect();

    Json(json!({
        "name": "DramaBox API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "短剧目录聚合后端",
        "endpoints": {
            "GET /home": "首页: 推荐、热门、最新、VIP",
            "GET /latest": "最新上线",
            "GET /random": "随机推荐",
            "GET /search?q=": "搜索短剧",
            "GET /populersearch": "热搜关键词",
            "GET /dubindo?classify=&page=": "印尼语配音目录 (分页)",
            "GET /drama/{bookId}": "短剧详情",
            "GET /watch/{bookId}/{episodeIndex}?quality=": "播放页",
            "GET /health": "健康检查"
        },
        "dubindoClassify": classify
    }))
}

/// 健康检查
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /home
async fn home_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HomeView::fetch(state.catalog.as_ref()).await)
}

/// GET /latest
async fn latest_handler(State(state): State<AppState>) -> impl IntoResponse {
    let listing = settle("latest", state.catalog.latest().await);
    Json(ListView::from_listing(listing))
}

/// GET /random
async fn random_handler(State(state): State<AppState>) -> impl IntoResponse {
    let listing = settle("random", state.catalog.random().await);
    Json(ListView::from_listing(listing))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// GET /search?q=
async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    info!("🔍 搜索: {}", params.q);
    Json(SearchView::fetch(state.catalog.as_ref(), &params.q).await)
}

/// GET /populersearch
async fn popular_search_handler(State(state): State<AppState>) -> impl IntoResponse {
    let keywords = popular_keywords(state.catalog.as_ref()).await;
    Json(json!({ "keywords": keywords }))
}

#[derive(Debug, Deserialize)]
struct DubIndoParams {
    classify: Option<String>,
    page: Option<u32>,
}

/// GET /dubindo?classify=&page=
async fn dub_indo_handler(
    State(state): State<AppState>,
    Query(params): Query<DubIndoParams>,
) -> impl IntoResponse {
    let classify = params
        .classify
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CLASSIFY.to_string());
    let page = params.page.unwrap_or(1);

    Json(DubIndoPageView::fetch(state.catalog.as_ref(), &classify, page).await)
}

/// GET /drama/{book_id}
async fn drama_handler(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> impl IntoResponse {
    Json(DetailView::fetch(state.catalog.as_ref(), &book_id).await)
}

#[derive(Debug, Deserialize)]
struct WatchParams {
    quality: Option<u32>,
}

/// GET /watch/{book_id}/{episode_index}?quality=
async fn watch_handler(
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(String, String)>,
    Query(params): Query<WatchParams>,
) -> impl IntoResponse {
    let index = parse_episode_index(&episode_index);
    Json(WatchView::fetch(state.catalog.as_ref(), &book_id, index, params.quality).await)
}
