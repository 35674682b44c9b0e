// src/provider/mod.rs

pub mod netease;
pub mod qq;

use crate::{
    client::RobustClient,
    config::AppConfig,
    error::AppResult,
    models::{Provider, ResolvedTrack, TrackReference},
};
use async_trait::async_trait;
use std::sync::Arc;

/// 单个音乐平台的解析能力。具体取数策略（接口查询、页面抽取）
/// 全部隔离在实现内部，编排层只面对这个接口。
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, reference: &TrackReference) -> AppResult<ResolvedTrack>;
}

pub fn resolver_for(
    provider: Provider,
    http_client: Arc<RobustClient>,
    config: Arc<AppConfig>,
) -> Box<dyn TrackResolver> {
    match provider {
        Provider::Qq => Box::new(qq::QqResolver::new(http_client, config)),
        Provider::Netease => Box::new(netease::NeteaseResolver::new(http_client, config)),
    }
}
