// src/provider/netease.rs

use super::TrackResolver;
use crate::{
    client::RobustClient,
    config::AppConfig,
    constants::netease as netease_const,
    error::{AppError, AppResult},
    models::{Provider, ResolvedTrack, TrackReference, api::NeteaseSongDetailResponse},
};
use async_trait::async_trait;
use log::info;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static ID_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"id=(\d+)").unwrap());

pub struct NeteaseResolver {
    http_client: Arc<RobustClient>,
    config: Arc<AppConfig>,
}

impl NeteaseResolver {
    pub fn new(http_client: Arc<RobustClient>, config: Arc<AppConfig>) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// 裸数字 ID 直接使用；链接从 id=<digits> 参数中提取
    fn extract_id(raw_id: &str) -> AppResult<String> {
        if !raw_id.is_empty() && raw_id.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(raw_id.to_string());
        }
        ID_PARAM_RE
            .captures(raw_id)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| AppError::ParseFailure(format!("无法从 '{raw_id}' 中提取歌曲 ID")))
    }

    /// 外链播放地址是 ID 的纯函数，不经过任何接口
    pub fn outer_stream_url(id: &str) -> String {
        format!("{}{}.mp3", netease_const::OUTER_STREAM_BASE, id)
    }
}

#[async_trait]
impl TrackResolver for NeteaseResolver {
    async fn resolve(&self, reference: &TrackReference) -> AppResult<ResolvedTrack> {
        let id = Self::extract_id(&reference.raw_id)?;
        info!("查询网易云歌曲详情, ID: {}", id);

        let url = format!(
            "{}{}",
            self.config.netease_api_base,
            netease_const::SONG_DETAIL_PATH
        );
        let ids_param = format!("[{id}]");
        let response: NeteaseSongDetailResponse = self
            .http_client
            .get_json(
                &url,
                &[("id", id.as_str()), ("ids", ids_param.as_str())],
                Some(netease_const::REFERER),
            )
            .await?;

        let Some(song) = response.songs.into_iter().next() else {
            return Err(AppError::TrackNotFound(format!(
                "网易云未返回 ID '{id}' 的歌曲"
            )));
        };

        Ok(ResolvedTrack {
            id: song.id.to_string(),
            name: song.name,
            artists: song.artists.into_iter().map(|a| a.name).collect(),
            stream_url: Self::outer_stream_url(&id),
            cover_url: song.album.map(|a| a.pic_url).unwrap_or_default(),
            provider: Provider::Netease,
        })
    }
}
