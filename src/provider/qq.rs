// src/provider/qq.rs

use super::TrackResolver;
use crate::{
    client::RobustClient,
    config::AppConfig,
    constants::qq as qq_const,
    error::{AppError, AppResult},
    models::{
        Provider, ResolvedTrack, TrackReference,
        api::{QqCdnDispatchData, QqSongDetailData, QqVkeyData},
    },
};
use async_trait::async_trait;
use log::{debug, info, warn};
use rand::Rng;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use url::Url;

// 歌曲页内嵌数据的脚本变量标记
static INITIAL_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)window\.__INITIAL_DATA__\s*=\s*(.*?)</script>").unwrap());

pub struct QqResolver {
    http_client: Arc<RobustClient>,
    config: Arc<AppConfig>,
}

/// 歌曲页或详情接口抽取出的中间元数据
#[derive(Debug, Clone)]
struct QqMetadata {
    mid: String,
    media_mid: Option<String>,
    name: String,
    artists: Vec<String>,
    cover_url: String,
}

impl QqResolver {
    pub fn new(http_client: Arc<RobustClient>, config: Arc<AppConfig>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    async fn resolve_metadata(&self, raw_id: &str) -> AppResult<QqMetadata> {
        let is_link = Url::parse(raw_id)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if is_link {
            self.metadata_from_page(raw_id).await
        } else {
            self.metadata_from_api(raw_id).await
        }
    }

    /// 链接形式：抓取歌曲页并抽取脚本变量里的 JSON 数据块
    async fn metadata_from_page(&self, page_url: &str) -> AppResult<QqMetadata> {
        info!("从歌曲页抽取元数据: {}", page_url);
        let html = self
            .http_client
            .get_text(page_url, Some(qq_const::REFERER))
            .await?;
        let root = extract_embedded_json(&html)?;

        // 数据块可能是歌曲列表，也可能是单曲节点；列表取第一项
        let song = root
            .get("songList")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .or_else(|| root.get("songDetail"))
            .ok_or_else(|| AppError::TrackNotFound("页面数据中没有歌曲节点".to_string()))?;

        metadata_from_song_node(song)
    }

    /// 裸 ID 形式：纯数字按 song_id 查询，其余按 song_mid 查询
    async fn metadata_from_api(&self, raw_id: &str) -> AppResult<QqMetadata> {
        let param = match raw_id.parse::<u64>() {
            Ok(song_id) => json!({ "song_id": song_id }),
            Err(_) => json!({ "song_mid": raw_id }),
        };

        let response = self
            .musicu_request(
                qq_const::SONG_DETAIL_MODULE,
                qq_const::SONG_DETAIL_METHOD,
                param,
            )
            .await?;

        let Some(data) = response.get("data") else {
            return Err(AppError::TrackNotFound(format!(
                "'{raw_id}' 的详情响应缺少 data 节点"
            )));
        };
        if data.get("track_info").is_none() {
            return Err(AppError::TrackNotFound(format!(
                "'{raw_id}' 的详情响应缺少 track_info 节点"
            )));
        }
        let detail: QqSongDetailData = serde_json::from_value(data.clone())?;
        let info = detail.track_info;

        Ok(QqMetadata {
            name: info.display_name(),
            media_mid: info.file.and_then(|f| f.media_mid),
            artists: info.singer.into_iter().map(|s| s.name).collect(),
            cover_url: info
                .album
                .and_then(|a| a.mid)
                .map(|mid| cover_url_for(&mid))
                .unwrap_or_default(),
            mid: info.mid,
        })
    }

    /// 为已解析的元数据推导播放链接。
    /// 拿不到链接不算硬失败，这条链路上的任何异常都降级为 None。
    pub async fn resolve_play_url(&self, mid: &str, media_mid: Option<&str>) -> Option<String> {
        match self.try_resolve_play_url(mid, media_mid).await {
            Ok(link) => Some(link),
            Err(AppError::NoPlayableUrl) => {
                debug!("'{}' 没有可推导的播放链接", mid);
                None
            }
            Err(e) => {
                warn!("推导 '{}' 的播放链接失败: {}", mid, e);
                None
            }
        }
    }

    async fn try_resolve_play_url(&self, mid: &str, media_mid: Option<&str>) -> AppResult<String> {
        // vkey 与 guid 绑定，复用旧值容易被 CDN 拒绝，每次取链都重新生成
        let guid = fresh_guid();
        let filename = format!(
            "{}{}{}",
            qq_const::QUALITY_PREFIX,
            media_mid.unwrap_or(mid),
            qq_const::AUDIO_EXT
        );

        let payload = json!({
            "comm": { "ct": 24, "cv": 0, "format": "json", "uin": 0 },
            "req": {
                "module": qq_const::CDN_DISPATCH_MODULE,
                "method": qq_const::CDN_DISPATCH_METHOD,
                "param": { "guid": guid.as_str(), "calltype": 0, "userip": "" },
            },
            "req_1": {
                "module": qq_const::VKEY_MODULE,
                "method": qq_const::VKEY_METHOD,
                "param": {
                    "guid": guid.as_str(),
                    "songmid": [mid],
                    "songtype": [0],
                    "uin": "0",
                    "loginflag": 1,
                    "platform": "20",
                    "filename": [filename.as_str()],
                },
            },
        });
        let url = format!("{}{}", self.config.qq_api_base, qq_const::MUSICU_PATH);
        let response = self
            .http_client
            .post_value(&url, &payload, Some(qq_const::REFERER))
            .await?;

        // 1. vkey 子响应带出的 purl 直接拼在固定 CDN 主机后面
        if let Some(data) = response.pointer("/req_1/data") {
            let vkey_data: QqVkeyData = serde_json::from_value(data.clone())?;
            if let Some(first) = vkey_data.midurlinfo.first()
                && !first.purl.is_empty()
            {
                return Ok(format!("{}{}", qq_const::STREAM_HOST, first.purl));
            }
        }

        // 2. 退回到调度子响应的通用 vkey，手工拼出完整链接
        if let Some(data) = response.pointer("/req/data") {
            let dispatch: QqCdnDispatchData = serde_json::from_value(data.clone())?;
            if !dispatch.vkey.is_empty() {
                return Ok(format!(
                    "{}{}?vkey={}&guid={}{}",
                    qq_const::STREAM_HOST,
                    filename,
                    dispatch.vkey,
                    guid,
                    qq_const::STREAM_URL_TAIL
                ));
            }
        }

        Err(AppError::NoPlayableUrl)
    }

    /// 所有 musicu.fcg 业务请求的统一入口，返回对应业务键下的块
    async fn musicu_request(
        &self,
        module: &str,
        method: &str,
        param: Value,
    ) -> AppResult<Value> {
        let request_key = format!("{module}.{method}");
        let payload = json!({
            "comm": { "ct": 24, "cv": 0, "format": "json", "uin": 0 },
            &request_key: { "module": module, "method": method, "param": param },
        });
        let url = format!("{}{}", self.config.qq_api_base, qq_const::MUSICU_PATH);
        let response = self
            .http_client
            .post_value(&url, &payload, Some(qq_const::REFERER))
            .await?;
        response
            .get(&request_key)
            .cloned()
            .ok_or_else(|| AppError::ParseFailure(format!("响应缺少业务块 '{request_key}'")))
    }
}

#[async_trait]
impl TrackResolver for QqResolver {
    async fn resolve(&self, reference: &TrackReference) -> AppResult<ResolvedTrack> {
        let meta = self.resolve_metadata(&reference.raw_id).await?;
        let stream_url = self
            .resolve_play_url(&meta.mid, meta.media_mid.as_deref())
            .await
            .unwrap_or_default();

        Ok(ResolvedTrack {
            id: meta.mid,
            name: meta.name,
            artists: meta.artists,
            stream_url,
            cover_url: meta.cover_url,
            provider: Provider::Qq,
        })
    }
}

/// 从页面 HTML 中定位脚本变量标记并解析出 JSON 数据块
fn extract_embedded_json(html: &str) -> AppResult<Value> {
    let caps = INITIAL_DATA_RE
        .captures(html)
        .ok_or_else(|| AppError::MarkerNotFound("window.__INITIAL_DATA__".to_string()))?;
    let blob = caps[1].trim().trim_end_matches(';').trim();
    Ok(serde_json::from_str(blob)?)
}

fn metadata_from_song_node(song: &Value) -> AppResult<QqMetadata> {
    let mid = song
        .get("mid")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::ParseFailure("歌曲节点缺少 mid".to_string()))?;
    let name = song
        .get("name")
        .or_else(|| song.get("title"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let artists = song
        .get("singer")
        .and_then(Value::as_array)
        .map(|singers| {
            singers
                .iter()
                .filter_map(|s| s.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(QqMetadata {
        mid: mid.to_string(),
        media_mid: song
            .pointer("/file/media_mid")
            .and_then(Value::as_str)
            .map(str::to_string),
        name: name.to_string(),
        artists,
        cover_url: song
            .pointer("/album/mid")
            .and_then(Value::as_str)
            .map(cover_url_for)
            .unwrap_or_default(),
    })
}

fn cover_url_for(album_mid: &str) -> String {
    let size = qq_const::ALBUM_COVER_SIZE;
    format!(
        "{}T002R{size}x{size}M000{album_mid}.jpg",
        qq_const::ALBUM_COVER_BASE
    )
}

fn fresh_guid() -> String {
    rand::rng()
        .random_range(1_000_000_000u64..=9_999_999_999)
        .to_string()
}
