//! 响应归一化
//! 把各接口的原始 JSON 统一为 `Listing` 形状

use crate::types::{Drama, Listing};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// 归一化扁平列表接口 (`{status, data: [...]}`)
///
/// `data` 不是数组时视为空列表, 不让整个页面失败。
pub fn normalize_list<T: DeserializeOwned>(raw: &Value) -> Listing<T> {
    match raw.get("data") {
        Some(Value::Array(items)) => Listing {
            ok: envelope_ok(raw),
            items: decode_items(items),
        },
        _ => {
            debug!("响应 data 不是列表, 按空列表处理");
            Listing::failed()
        }
    }
}

/// 归一化 VIP 接口
///
/// VIP 响应按栏目分组 (`data.columnVoList[].bookList`), 这里按栏目顺序展开为
/// 单一列表。跨栏目的重复条目原样保留, 去重由聚合器负责。
pub fn normalize_vip(raw: &Value) -> Listing<Drama> {
    if !envelope_ok(raw) {
        warn!("VIP 响应状态为失败");
        return Listing::failed();
    }

    let Some(columns) = raw.pointer("/data/columnVoList").and_then(Value::as_array) else {
        warn!("VIP 响应缺少 columnVoList");
        return Listing::failed();
    };

    let mut items = Vec::new();
    for column in columns {
        match column.get("bookList") {
            Some(Value::Array(books)) => items.extend(decode_items::<Drama>(books)),
            _ => {
                let title = column.get("title").and_then(Value::as_str).unwrap_or("?");
                debug!("跳过没有 bookList 的栏目: {}", title);
            }
        }
    }

    debug!("VIP {} 个栏目展开为 {} 个条目", columns.len(), items.len());
    Listing::new(items)
}

/// 缺少 `status` 字段时视为成功
fn envelope_ok(raw: &Value) -> bool {
    raw.get("status").and_then(Value::as_bool).unwrap_or(true)
}

/// 逐条解码, 丢弃无法解析的条目
fn decode_items<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!("丢弃无法解析的条目: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Episode;
    use serde_json::json;

    fn ids(listing: &Listing<Drama>) -> Vec<&str> {
        listing.items.iter().map(|d| d.book_id.as_str()).collect()
    }

    #[test]
    fn test_vip_flatten_preserves_column_order() {
        let raw = json!({
            "status": true,
            "data": {
                "columnVoList": [
                    { "columnId": 1, "title": "Populer", "bookList": [{"bookId": "a"}, {"bookId": "b"}] },
                    { "columnId": 2, "title": "Baru", "bookList": [{"bookId": "c"}] },
                    { "columnId": 3, "title": "Eksklusif", "bookList": [{"bookId": "a"}, {"bookId": "d"}] }
                ]
            }
        });

        let listing = normalize_vip(&raw);
        assert!(listing.ok);
        assert_eq!(ids(&listing), vec!["a", "b", "c", "a", "d"]);
    }

    #[test]
    fn test_vip_failure_status() {
        let raw = json!({
            "status": false,
            "data": { "columnVoList": [{ "bookList": [{"bookId": "a"}] }] }
        });
        assert_eq!(normalize_vip(&raw), Listing::failed());
    }

    #[test]
    fn test_vip_missing_columns() {
        assert_eq!(normalize_vip(&json!({"status": true, "data": {}})), Listing::failed());
        assert_eq!(
            normalize_vip(&json!({"status": true, "data": {"columnVoList": "oops"}})),
            Listing::failed()
        );
        assert_eq!(normalize_vip(&json!(null)), Listing::failed());
    }

    #[test]
    fn test_vip_skips_column_without_book_list() {
        let raw = json!({
            "status": true,
            "data": {
                "columnVoList": [
                    { "columnId": 1, "title": "Kosong" },
                    { "columnId": 2, "title": "Isi", "bookList": [{"bookId": "x"}] }
                ]
            }
        });
        assert_eq!(ids(&normalize_vip(&raw)), vec!["x"]);
    }

    #[test]
    fn test_list_non_array_data() {
        let listing: Listing<Drama> = normalize_list(&json!({"status": true, "data": {"msg": "no"}}));
        assert!(!listing.ok);
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_list_drops_undecodable_items() {
        let raw = json!({
            "status": true,
            "data": [{"bookId": "1"}, {"bookName": "no id"}, 7, {"bookId": 2}]
        });
        let listing: Listing<Drama> = normalize_list(&raw);
        assert!(listing.ok);
        assert_eq!(ids(&listing), vec!["1", "2"]);
    }

    #[test]
    fn test_episode_positions_survive_missing_chapter_id() {
        let raw = json!({
            "status": true,
            "data": [
                {"chapterId": "c0", "chapterIndex": 0},
                {"chapterIndex": 1},
                {"chapterId": null, "chapterIndex": 2},
                {"chapterId": 3003, "chapterIndex": 3}
            ]
        });
        let listing: Listing<Episode> = normalize_list(&raw);
        let ids: Vec<&str> = listing.items.iter().map(|e| e.chapter_id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "", "", "3003"]);
        assert_eq!(listing.items[3].chapter_index, 3);
    }

    #[test]
    fn test_list_of_keywords() {
        let listing: Listing<String> =
            normalize_list(&json!({"status": true, "data": ["CEO", "Mafia"]}));
        assert_eq!(listing.items, vec!["CEO".to_string(), "Mafia".to_string()]);
    }
}
