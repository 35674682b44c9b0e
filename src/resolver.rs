// src/resolver.rs

use crate::{
    cache::TrackCache,
    client::RobustClient,
    config::AppConfig,
    constants,
    error::AppResult,
    models::{DailyNote, Provider, Recommendation, ResolvedTrack},
    notes::NoteStore,
    provider,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

/// 单次请求的流程：读笔记 → 查缓存 → (未命中) 分发平台解析 → 写缓存 → 组装响应。
/// 平台侧的一切失败都在这里吞掉并降级为纯文本响应，绝不向上传播。
pub struct ResolutionOrchestrator {
    notes: NoteStore,
    cache: Arc<TokioMutex<TrackCache>>,
    http_client: Arc<RobustClient>,
    config: Arc<AppConfig>,
}

impl ResolutionOrchestrator {
    pub fn new(
        notes: NoteStore,
        cache: Arc<TokioMutex<TrackCache>>,
        http_client: Arc<RobustClient>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            notes,
            cache,
            http_client,
            config,
        }
    }

    /// 组装 target 当天的推荐响应。只有 NoteNotFound 会作为错误返回，
    /// 由调用方换成保底载荷。
    pub async fn recommend_for(&self, target: NaiveDate) -> AppResult<Recommendation> {
        let note = self.notes.note_for_date(target)?;
        let is_today = note.date == target;

        let Some(reference) = note.track_reference() else {
            debug!("笔记 '{}' 未声明曲目，返回纯文本响应", note.date);
            return Ok(content_only(&note, is_today));
        };

        // 命中缓存就不再碰网络
        if let Some(track) = self
            .cache
            .lock()
            .await
            .get(reference.provider, &reference.raw_id)
            .cloned()
        {
            info!("缓存命中: {}:{}", reference.provider.tag(), reference.raw_id);
            return Ok(assemble(&note, &track, is_today));
        }

        let resolver = provider::resolver_for(
            reference.provider,
            self.http_client.clone(),
            self.config.clone(),
        );
        match resolver.resolve(&reference).await {
            Ok(track) => {
                let mut cache = self.cache.lock().await;
                if let Err(e) = cache.put(reference.provider, &reference.raw_id, track.clone()) {
                    // 持久化失败不影响本次响应
                    warn!("写入缓存失败: {}", e);
                }
                Ok(assemble(&note, &track, is_today))
            }
            Err(e) => {
                warn!(
                    "解析 {}:{} 失败，降级为纯文本响应: {}",
                    reference.provider.tag(),
                    reference.raw_id,
                    e
                );
                Ok(content_only(&note, is_today))
            }
        }
    }

    /// 完全没有可用笔记时的固定保底载荷
    pub fn fallback_payload(target: NaiveDate) -> Recommendation {
        Recommendation {
            success: false,
            date: target.to_string(),
            is_today: false,
            music_id: constants::FALLBACK_MUSIC_ID.to_string(),
            name: constants::FALLBACK_TITLE.to_string(),
            artists: Vec::new(),
            music_url: String::new(),
            cover: String::new(),
            content: constants::FALLBACK_CONTENT.to_string(),
            provider_tag: "none".to_string(),
        }
    }
}

/// 解析成功（或缓存命中）时的完整响应
fn assemble(note: &DailyNote, track: &ResolvedTrack, is_today: bool) -> Recommendation {
    Recommendation {
        success: true,
        date: note.date.to_string(),
        is_today,
        music_id: track.id.clone(),
        name: track.name.clone(),
        artists: track.artists.clone(),
        music_url: track.stream_url.clone(),
        cover: track.cover_url.clone(),
        content: note.body.clone(),
        provider_tag: track.provider.tag().to_string(),
    }
}

/// 无曲目或解析失败时的纯文本响应；正文无论如何都要带上
fn content_only(note: &DailyNote, is_today: bool) -> Recommendation {
    Recommendation {
        success: true,
        date: note.date.to_string(),
        is_today,
        music_id: note.raw_id.clone(),
        name: String::new(),
        artists: Vec::new(),
        music_url: String::new(),
        cover: String::new(),
        content: note.body.clone(),
        provider_tag: note
            .provider
            .map(Provider::tag)
            .unwrap_or("none")
            .to_string(),
    }
}

/// 笔记按东八区日期归档，"今天"也按同一偏移计算
pub fn today_cn() -> NaiveDate {
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    Utc::now().with_timezone(&offset).date_naive()
}
