// src/cache.rs

use crate::{
    error::AppResult,
    models::{Provider, ResolvedTrack, cache_key},
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::PathBuf,
    sync::Mutex,
};

/// 持久化文档中的一条缓存记录，列表顺序即插入顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub track: ResolvedTrack,
}

/// 缓存的持久化后端。文件实现用于正常运行，内存实现用于测试替身。
pub trait CacheStorage: Send + Sync {
    fn load(&self) -> AppResult<Vec<CacheEntry>>;
    fn save(&self, entries: &[CacheEntry]) -> AppResult<()>;
}

/// 把整个缓存存成单个 JSON 文档。文件缺失或损坏时按空缓存启动，不阻塞进程。
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CacheStorage for JsonFileStorage {
    fn load(&self) -> AppResult<Vec<CacheEntry>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("缓存文件 '{}' 无法解析，按空缓存处理: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[CacheEntry]) -> AppResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// 内存后端，供测试注入
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<Vec<CacheEntry>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl CacheStorage for MemoryStorage {
    fn load(&self) -> AppResult<Vec<CacheEntry>> {
        Ok(self.snapshot())
    }

    fn save(&self, entries: &[CacheEntry]) -> AppResult<()> {
        if let Ok(mut guard) = self.entries.lock() {
            *guard = entries.to_vec();
        }
        Ok(())
    }
}

/// (来源, ID) 到已解析曲目的有界映射。
///
/// 淘汰策略是严格的先进先出：容量满时移除最早插入的键，再写入新键。
/// 覆盖已有键不改变其在队列中的位置。每次写入后同步落盘（写穿）。
/// 多线程环境下整个 读-改-淘汰-落盘 序列必须在同一把锁内完成，
/// 调用方统一通过 tokio::sync::Mutex 持有本结构。
pub struct TrackCache {
    entries: HashMap<String, ResolvedTrack>,
    order: VecDeque<String>,
    capacity: usize,
    storage: Box<dyn CacheStorage>,
}

impl TrackCache {
    /// 启动时读取一次持久化存储，读取失败按空缓存继续
    pub fn open(storage: Box<dyn CacheStorage>, capacity: usize) -> Self {
        let loaded = storage.load().unwrap_or_else(|e| {
            warn!("读取缓存存储失败，按空缓存启动: {}", e);
            Vec::new()
        });

        let mut entries = HashMap::with_capacity(loaded.len());
        let mut order = VecDeque::with_capacity(loaded.len());
        for entry in loaded {
            if entries.insert(entry.key.clone(), entry.track).is_none() {
                order.push_back(entry.key);
            }
        }

        Self {
            entries,
            order,
            capacity,
            storage,
        }
    }

    /// 按笔记声明的引用 ID 查找，与 put 使用同一复合键
    pub fn get(&self, provider: Provider, reference_id: &str) -> Option<&ResolvedTrack> {
        self.entries.get(&cache_key(provider, reference_id))
    }

    /// 写入键必须与查找键一致：复合键由来源和笔记声明的引用 ID 构成，
    /// 而不是解析后的曲目 ID（链接或数字 ID 形式的引用解析后两者并不相同）
    pub fn put(&mut self, provider: Provider, reference_id: &str, track: ResolvedTrack) -> AppResult<()> {
        let key = cache_key(provider, reference_id);
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
            self.order.push_back(key.clone());
        }
        self.entries.insert(key, track);
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> AppResult<()> {
        let snapshot: Vec<CacheEntry> = self
            .order
            .iter()
            .filter_map(|key| {
                self.entries.get(key).map(|track| CacheEntry {
                    key: key.clone(),
                    track: track.clone(),
                })
            })
            .collect();
        self.storage.save(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn track(provider: Provider, id: &str) -> ResolvedTrack {
        ResolvedTrack {
            id: id.to_string(),
            name: format!("歌曲 {id}"),
            artists: vec!["测试歌手".to_string()],
            stream_url: String::new(),
            cover_url: String::new(),
            provider,
        }
    }

    // MemoryStorage 的共享包装，便于在测试中观察落盘内容
    struct SharedStorage(Arc<MemoryStorage>);

    impl CacheStorage for SharedStorage {
        fn load(&self) -> AppResult<Vec<CacheEntry>> {
            self.0.load()
        }
        fn save(&self, entries: &[CacheEntry]) -> AppResult<()> {
            self.0.save(entries)
        }
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut cache = TrackCache::open(Box::new(MemoryStorage::new()), 3);
        for id in ["1", "2", "3"] {
            cache.put(Provider::Netease, id, track(Provider::Netease, id)).unwrap();
        }
        assert_eq!(cache.len(), 3);

        // 第 4 个不同的键应恰好淘汰最早插入的 "1"
        cache.put(Provider::Netease, "4", track(Provider::Netease, "4")).unwrap();
        assert_eq!(cache.len(), 3);
        assert!(cache.get(Provider::Netease, "1").is_none());
        assert!(cache.get(Provider::Netease, "2").is_some());
        assert!(cache.get(Provider::Netease, "4").is_some());
    }

    #[test]
    fn test_overwrite_keeps_queue_position() {
        let mut cache = TrackCache::open(Box::new(MemoryStorage::new()), 2);
        cache.put(Provider::Qq, "a", track(Provider::Qq, "a")).unwrap();
        cache.put(Provider::Qq, "b", track(Provider::Qq, "b")).unwrap();

        // 覆盖 "a" 不应增长队列；下一次淘汰仍然轮到 "a"
        let mut updated = track(Provider::Qq, "a");
        updated.name = "新名字".to_string();
        cache.put(Provider::Qq, "a", updated).unwrap();
        assert_eq!(cache.len(), 2);

        cache.put(Provider::Qq, "c", track(Provider::Qq, "c")).unwrap();
        assert!(cache.get(Provider::Qq, "a").is_none());
        assert!(cache.get(Provider::Qq, "b").is_some());
    }

    #[test]
    fn test_composite_key_separates_providers() {
        let mut cache = TrackCache::open(Box::new(MemoryStorage::new()), 10);
        cache.put(Provider::Qq, "42", track(Provider::Qq, "42")).unwrap();
        cache.put(Provider::Netease, "42", track(Provider::Netease, "42")).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_write_through_persistence() {
        let storage = Arc::new(MemoryStorage::new());
        let mut cache = TrackCache::open(Box::new(SharedStorage(storage.clone())), 10);

        cache.put(Provider::Netease, "1", track(Provider::Netease, "1")).unwrap();
        cache.put(Provider::Netease, "2", track(Provider::Netease, "2")).unwrap();

        let persisted = storage.snapshot();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].key, "netease:1");
        assert_eq!(persisted[1].key, "netease:2");

        // 重新打开时应还原内容与插入顺序
        let reopened = TrackCache::open(Box::new(SharedStorage(storage)), 10);
        assert_eq!(reopened.len(), 2);
        assert!(reopened.get(Provider::Netease, "1").is_some());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track-cache.json");
        fs::write(&path, "{ 这不是合法的JSON").unwrap();

        let cache = TrackCache::open(Box::new(JsonFileStorage::new(&path)), 10);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("不存在.json");
        let cache = TrackCache::open(Box::new(JsonFileStorage::new(path)), 10);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track-cache.json");

        let mut cache = TrackCache::open(Box::new(JsonFileStorage::new(&path)), 10);
        let mut qq_track = track(Provider::Qq, "003OUlho2HcRHC");
        qq_track.stream_url = "https://isure.stream.qqmusic.qq.com/abc".to_string();
        cache.put(Provider::Qq, "003OUlho2HcRHC", qq_track).unwrap();

        let reopened = TrackCache::open(Box::new(JsonFileStorage::new(&path)), 10);
        let restored = reopened.get(Provider::Qq, "003OUlho2HcRHC").unwrap();
        assert_eq!(restored.stream_url, "https://isure.stream.qqmusic.qq.com/abc");
    }
}
