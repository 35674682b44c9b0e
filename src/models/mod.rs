// src/models/mod.rs

pub mod api;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 曲目来源平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "qq")]
    Qq,
    // "163" 是早期笔记使用的旧版数字标签
    #[serde(rename = "netease", alias = "163")]
    Netease,
}

impl Provider {
    pub fn tag(self) -> &'static str {
        match self {
            Provider::Qq => "qq",
            Provider::Netease => "netease",
        }
    }

    /// 解析笔记头部的 type 字段，无法识别的标签视为无来源
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "qq" => Some(Provider::Qq),
            "netease" | "163" => Some(Provider::Netease),
            _ => None,
        }
    }
}

/// 每日推荐笔记，从笔记目录中按日期读出后不再修改
#[derive(Debug, Clone)]
pub struct DailyNote {
    pub date: NaiveDate,
    pub provider: Option<Provider>,
    pub raw_id: String,
    pub body: String,
}

impl DailyNote {
    /// 笔记声明了来源和 ID 时，派生出待解析的曲目引用
    pub fn track_reference(&self) -> Option<TrackReference> {
        let provider = self.provider?;
        if self.raw_id.is_empty() {
            return None;
        }
        Some(TrackReference {
            provider,
            raw_id: self.raw_id.clone(),
        })
    }
}

/// 待解析的曲目引用，raw_id 可能是裸 ID，也可能是完整链接
#[derive(Debug, Clone)]
pub struct TrackReference {
    pub provider: Provider,
    pub raw_id: String,
}

/// 解析完成的曲目信息，也是缓存中存放的值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    // 允许为空：拿不到播放链接不算失败，纯元数据同样会被缓存
    #[serde(default)]
    pub stream_url: String,
    #[serde(default)]
    pub cover_url: String,
    pub provider: Provider,
}

/// 缓存使用的复合键，每个 (来源, ID) 至多一条
pub fn cache_key(provider: Provider, id: &str) -> String {
    format!("{}:{}", provider.tag(), id)
}

/// 最终返回给调用方的推荐载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub success: bool,
    pub date: String,
    pub is_today: bool,
    pub music_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub music_url: String,
    pub cover: String,
    pub content: String,
    #[serde(rename = "type")]
    pub provider_tag: String,
}
