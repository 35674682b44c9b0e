// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{date} 及之前没有任何推荐笔记")]
    NoteNotFound { date: NaiveDate },
    #[error("页面中未找到内嵌数据标记: {0}")]
    MarkerNotFound(String),
    #[error("上游响应结构不符合预期: {0}")]
    ParseFailure(String),
    #[error("上游未返回曲目信息: {0}")]
    TrackNotFound(String),
    #[error("已解析到元数据，但无法推导出播放链接")]
    NoPlayableUrl,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无法解析来自 '{url}' 的API响应: {source}")]
    ApiParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
