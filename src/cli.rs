// src/cli.rs

use chrono::NaiveDate;
use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    after_help = "示例:\n  # 解析今天的推荐\n  today-music\n\n  # 查询指定日期，并美化输出\n  today-music --date 2025-12-19 -p\n\n  # 指定笔记目录\n  today-music -n ./music-data",
)]
pub struct Cli {
    /// 查询指定日期的推荐 (YYYY-MM-DD)，默认为今天 (东八区)
    #[arg(short, long, value_name = "DATE", help_heading = "Options")]
    pub date: Option<NaiveDate>,
    /// 推荐笔记所在目录 (默认为 music-data)
    #[arg(short, long, value_name = "DIR", help_heading = "Options")]
    pub notes_dir: Option<PathBuf>,
    /// 曲目缓存文件路径
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub cache_file: Option<PathBuf>,
    /// 以缩进格式输出响应 JSON
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub pretty: bool,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
