// src/lib.rs

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod notes;
pub mod provider;
pub mod resolver;
pub mod symbols;

use crate::{
    cache::{JsonFileStorage, TrackCache},
    cli::Cli,
    client::RobustClient,
    config::AppConfig,
    error::{AppError, AppResult},
    notes::NoteStore,
    resolver::ResolutionOrchestrator,
};
use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let http_client = Arc::new(RobustClient::new(config.clone())?);
    let storage = JsonFileStorage::new(config.cache_file.clone());
    let cache = Arc::new(TokioMutex::new(TrackCache::open(
        Box::new(storage),
        config.cache_capacity,
    )));

    let orchestrator = ResolutionOrchestrator::new(
        NoteStore::new(config.notes_dir.clone()),
        cache,
        http_client,
        config.clone(),
    );

    let target = args.date.unwrap_or_else(resolver::today_cn);
    match orchestrator.recommend_for(target).await {
        Ok(payload) => {
            if !payload.is_today {
                eprintln!(
                    "{} {} 暂无更新，返回 {} 的推荐。",
                    *symbols::INFO, target, payload.date
                );
            }
            print_payload(&payload, args.pretty)?;
            Ok(())
        }
        Err(e @ AppError::NoteNotFound { .. }) => {
            // 没有任何可用笔记：输出固定保底载荷，并以错误码退出
            eprintln!("{} 未找到 {} 及之前的任何推荐笔记。", *symbols::WARN, target);
            let payload = ResolutionOrchestrator::fallback_payload(target);
            print_payload(&payload, args.pretty)?;
            Err(e)
        }
        Err(e) => Err(e),
    }
}

fn print_payload(payload: &crate::models::Recommendation, pretty: bool) -> AppResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };
    println!("{json}");
    Ok(())
}
