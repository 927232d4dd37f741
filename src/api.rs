//! DramaBox 上游接口
//! 每个路由对应一个方法, 统一返回归一化后的 `Listing`

use crate::http_client::{get_json, FetchError};
use crate::normalizer::{normalize_list, normalize_vip};
use crate::types::{Drama, Episode, Listing};
use async_trait::async_trait;
use tracing::debug;

/// 配音目录的默认分类
pub const DEFAULT_CLASSIFY: &str = "terpopuler";

/// 短剧目录数据源
///
/// 聚合器和页面只依赖这个 trait, 测试中可以替换为内存实现。
#[async_trait]
pub trait Catalog: Send + Sync {
    /// GET /foryou
    async fn for_you(&self) -> Result<Listing<Drama>, FetchError>;

    /// GET /trending
    async fn trending(&self) -> Result<Listing<Drama>, FetchError>;

    /// GET /latest
    async fn latest(&self) -> Result<Listing<Drama>, FetchError>;

    /// GET /vip, 按栏目展开
    async fn vip(&self) -> Result<Listing<Drama>, FetchError>;

    /// GET /random
    async fn random(&self) -> Result<Listing<Drama>, FetchError>;

    /// GET /search?query={query}
    async fn search(&self, query: &str) -> Result<Listing<Drama>, FetchError>;

    /// GET /allepisode?bookId={book_id}
    async fn all_episodes(&self, book_id: &str) -> Result<Listing<Episode>, FetchError>;

    /// GET /dubindo?classify={classify}&page={page}
    async fn dub_indo(&self, classify: &str, page: u32) -> Result<Listing<Drama>, FetchError>;

    /// GET /populersearch
    async fn popular_search(&self) -> Result<Listing<String>, FetchError>;
}

/// 通过代理前缀访问的 DramaBox 接口
#[derive(Debug, Clone)]
pub struct DramaboxApi {
    base_url: String,
}

impl DramaboxApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Catalog for DramaboxApi {
    async fn for_you(&self) -> Result<Listing<Drama>, FetchError> {
        let raw = get_json(&self.url("/foryou")).await?;
        Ok(normalize_list(&raw))
    }

    async fn trending(&self) -> Result<Listing<Drama>, FetchError> {
        let raw = get_json(&self.url("/trending")).await?;
        Ok(normalize_list(&raw))
    }

    async fn latest(&self) -> Result<Listing<Drama>, FetchError> {
        let raw = get_json(&self.url("/latest")).await?;
        Ok(normalize_list(&raw))
    }

    async fn vip(&self) -> Result<Listing<Drama>, FetchError> {
        // VIP 是可选数据源, 请求失败也只返回失败的空列表
        match get_json(&self.url("/vip")).await {
            Ok(raw) => Ok(normalize_vip(&raw)),
            Err(e) => {
                debug!("VIP 按空列表处理: {}", e);
                Ok(Listing::failed())
            }
        }
    }

    async fn random(&self) -> Result<Listing<Drama>, FetchError> {
        let raw = get_json(&self.url("/random")).await?;
        Ok(normalize_list(&raw))
    }

    async fn search(&self, query: &str) -> Result<Listing<Drama>, FetchError> {
        let path = format!("/search?query={}", urlencoding::encode(query));
        let raw = get_json(&self.url(&path)).await?;
        Ok(normalize_list(&raw))
    }

    async fn all_episodes(&self, book_id: &str) -> Result<Listing<Episode>, FetchError> {
        let path = format!("/allepisode?bookId={}", urlencoding::encode(book_id));
        let raw = get_json(&self.url(&path)).await?;
        Ok(normalize_list(&raw))
    }

    async fn dub_indo(&self, classify: &str, page: u32) -> Result<Listing<Drama>, FetchError> {
        let path = format!(
            "/dubindo?classify={}&page={}",
            urlencoding::encode(classify),
            page
        );
        let raw = get_json(&self.url(&path)).await?;
        Ok(normalize_list(&raw))
    }

    async fn popular_search(&self) -> Result<Listing<String>, FetchError> {
        let raw = get_json(&self.url("/populersearch")).await?;
        Ok(normalize_list(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_base_url_trailing_slash() {
        let api = DramaboxApi::new("http://localhost:5173/api/dramabox/");
        assert_eq!(api.url("/trending"), "http://localhost:5173/api/dramabox/trending");
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("query".into(), "balas dendam & cinta".into()))
            .with_status(200)
            .with_body(r#"{"status":true,"data":[{"bookId":"9","bookName":"Balas Dendam"}]}"#)
            .create_async()
            .await;

        let api = DramaboxApi::new(server.url());
        let listing = api.search("balas dendam & cinta").await.unwrap();

        mock.assert_async().await;
        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.items[0].book_name, "Balas Dendam");
    }

    #[tokio::test]
    async fn test_dub_indo_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/dubindo")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("classify".into(), "terbaru".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"status":true,"data":[]}"#)
            .create_async()
            .await;

        let api = DramaboxApi::new(server.url());
        let listing = api.dub_indo("terbaru", 2).await.unwrap();

        mock.assert_async().await;
        assert!(listing.ok);
        assert!(listing.items.is_empty());
    }

    #[tokio::test]
    async fn test_vip_failure_is_best_effort() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/vip")
            .with_status(500)
            .create_async()
            .await;

        let api = DramaboxApi::new(server.url());
        let listing = api.vip().await.unwrap();
        assert_eq!(listing, Listing::failed());
    }

    #[tokio::test]
    async fn test_trending_failure_propagates() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/trending")
            .with_status(404)
            .create_async()
            .await;

        let api = DramaboxApi::new(server.url());
        let err = api.trending().await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: 404 }));
    }

    #[tokio::test]
    async fn test_all_episodes_decodes() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/allepisode")
            .match_query(Matcher::UrlEncoded("bookId".into(), "41000".into()))
            .with_status(200)
            .with_body(
                r#"{"status":true,"data":[
                    {"chapterId":"c0","chapterIndex":0,"chapterName":"EP 1","cdnList":[
                        {"cdnDomain":"cdn","isDefault":1,"videoPathList":[
                            {"quality":720,"videoPath":"https://cdn/0-720.mp4","isDefault":1}
                        ]}
                    ]},
                    {"chapterId":"c1","chapterIndex":1,"chapterName":"EP 2"}
                ]}"#,
            )
            .create_async()
            .await;

        let api = DramaboxApi::new(server.url());
        let listing = api.all_episodes("41000").await.unwrap();
        assert_eq!(listing.items.len(), 2);
        assert_eq!(listing.items[0].video_url(720), "https://cdn/0-720.mp4");
        assert!(listing.items[1].cdn_list.is_empty());
    }
}
