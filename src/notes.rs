// src/notes.rs

use crate::{
    error::{AppError, AppResult},
    models::{DailyNote, Provider},
};
use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;
use std::{fs, path::PathBuf, sync::LazyLock};

static NOTE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.md$").unwrap());
// 头部块：--- 与 --- 之间的键值区
static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\s*\n(.*?)\n---\s*\n?").unwrap());

/// 按日期命名的推荐笔记目录 (YYYY-MM-DD.md)
pub struct NoteStore {
    dir: PathBuf,
}

impl NoteStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 选出日期不晚于 target 的最新一篇笔记。
    /// 目录不存在或没有符合条件的文件时返回 NoteNotFound。
    pub fn note_for_date(&self, target: NaiveDate) -> AppResult<DailyNote> {
        let mut candidates: Vec<NaiveDate> = Vec::new();
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(iter) => iter,
            Err(e) => {
                debug!("笔记目录 '{}' 不可读: {}", self.dir.display(), e);
                return Err(AppError::NoteNotFound { date: target });
            }
        };

        for entry in read_dir.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(caps) = NOTE_FILE_RE.captures(name) else {
                continue;
            };
            match caps[1].parse::<NaiveDate>() {
                Ok(date) if date <= target => candidates.push(date),
                Ok(_) => {} // 未来日期的笔记先跳过
                Err(e) => warn!("笔记文件名 '{}' 中的日期无效: {}", name, e),
            }
        }

        let Some(date) = candidates.into_iter().max() else {
            return Err(AppError::NoteNotFound { date: target });
        };

        let path = self.dir.join(format!("{date}.md"));
        let content = fs::read_to_string(&path)?;
        debug!("选中笔记 '{}'", path.display());
        Ok(parse_note(date, &content))
    }
}

/// 解析笔记头部与正文。没有头部块时整篇内容作为正文。
fn parse_note(date: NaiveDate, content: &str) -> DailyNote {
    let Some(caps) = FRONT_MATTER_RE.captures(content) else {
        return DailyNote {
            date,
            provider: None,
            raw_id: String::new(),
            body: content.to_string(),
        };
    };

    let mut raw_id = String::new();
    let mut provider = None;
    for line in caps[1].lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "id" => raw_id = value.to_string(),
            "type" => provider = Provider::parse_tag(value),
            _ => {}
        }
    }

    let body = content[caps.get(0).map_or(0, |m| m.end())..].to_string();
    DailyNote {
        date,
        provider,
        raw_id,
        body,
    }
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}
