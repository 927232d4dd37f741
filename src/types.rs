//! 上游 DramaBox 接口的数据模型

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 播放器默认优先选择的清晰度
pub const DEFAULT_QUALITY: u32 = 720;

/// 短剧条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drama {
    #[serde(deserialize_with = "string_or_number")]
    pub book_id: String,
    #[serde(default)]
    pub book_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_wap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_v3s: Option<Vec<TagV3>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protagonist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<Corner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_vo: Option<RankVo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelf_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_library: Option<bool>,
}

impl Drama {
    /// 封面图: `coverWap` 优先, 其次 `cover`, 都为空时返回空串
    pub fn cover_image(&self) -> &str {
        first_non_empty([self.cover_wap.as_deref(), self.cover.as_deref()]).unwrap_or("")
    }

    /// 标签列表: `tags` 非空时使用, 否则 `tagNames`
    pub fn tag_list(&self) -> &[String] {
        [self.tags.as_deref(), self.tag_names.as_deref()]
            .into_iter()
            .flatten()
            .find(|list| !list.is_empty())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagV3 {
    #[serde(default)]
    pub tag_id: i64,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub tag_en_name: String,
}

/// 角标, 仅用于界面装饰
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corner {
    #[serde(default)]
    pub corner_type: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Corner {
    /// 角标颜色, 为空时由前端使用主题色
    pub fn badge_color(&self) -> Option<&str> {
        first_non_empty([Some(self.color.as_str())])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankVo {
    #[serde(default)]
    pub rank_type: i32,
    #[serde(default)]
    pub hot_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rec_copy: Option<String>,
    #[serde(default)]
    pub sort: i64,
}

/// 剧集
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// 缺失或为 null 时为空串, 剧集位置不能因此丢失
    #[serde(default, deserialize_with = "string_number_or_null")]
    pub chapter_id: String,
    #[serde(default)]
    pub chapter_index: u32,
    #[serde(default)]
    pub is_charge: i32,
    #[serde(default)]
    pub chapter_name: String,
    #[serde(default)]
    pub cdn_list: Vec<CdnMirror>,
    #[serde(default)]
    pub chapter_img: String,
    #[serde(default)]
    pub chapter_type: i32,
    #[serde(default)]
    pub charge_chapter: bool,
}

impl Episode {
    /// 生效的默认线路: 第一个 `isDefault == 1` 的线路, 否则第一条线路
    pub fn default_mirror(&self) -> Option<&CdnMirror> {
        self.cdn_list
            .iter()
            .find(|cdn| cdn.is_default == 1)
            .or_else(|| self.cdn_list.first())
    }

    /// 选择播放地址
    ///
    /// 在默认线路上优先匹配 `quality`, 其次默认清晰度, 最后第一个清晰度。
    /// 没有任何线路时返回空串。
    pub fn video_url(&self, quality: u32) -> &str {
        let Some(mirror) = self.default_mirror() else {
            return "";
        };

        mirror
            .video_path_list
            .iter()
            .find(|v| v.quality == quality)
            .or_else(|| mirror.default_variant())
            .map(|v| v.video_path.as_str())
            .unwrap_or("")
    }

    /// 默认线路上可选的清晰度, 没有时回退到 720
    pub fn available_qualities(&self) -> Vec<u32> {
        let qualities: Vec<u32> = self
            .default_mirror()
            .map(|m| m.video_path_list.iter().map(|v| v.quality).collect())
            .unwrap_or_default();

        if qualities.is_empty() {
            vec![DEFAULT_QUALITY]
        } else {
            qualities
        }
    }
}

/// CDN 线路
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdnMirror {
    #[serde(default)]
    pub cdn_domain: String,
    #[serde(default)]
    pub is_default: i32,
    #[serde(default)]
    pub video_path_list: Vec<VideoPath>,
}

impl CdnMirror {
    /// 生效的默认清晰度: 第一个 `isDefault == 1`, 否则第一个
    pub fn default_variant(&self) -> Option<&VideoPath> {
        self.video_path_list
            .iter()
            .find(|v| v.is_default == 1)
            .or_else(|| self.video_path_list.first())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPath {
    #[serde(default)]
    pub quality: u32,
    #[serde(default)]
    pub video_path: String,
    #[serde(default)]
    pub is_default: i32,
    #[serde(default)]
    pub is_entry: i32,
    #[serde(default)]
    pub is_vip_equity: i32,
}

/// 归一化后的列表结果, 每个数据源都产出这个形状
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T = Drama> {
    pub ok: bool,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { ok: true, items }
    }

    /// 失败的数据源贡献空列表
    pub fn failed() -> Self {
        Self {
            ok: false,
            items: Vec::new(),
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::failed()
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

/// 上游的 id 有时是数字, 统一为字符串
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number")),
    }
}

fn string_number_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        other => string_or_number(other).map_err(D::Error::custom),
    }
}
