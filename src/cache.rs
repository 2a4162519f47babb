//! 翻译缓存
//!
//! 按语言缓存完整的目录译文映射。条目只能整体安装：要么某语言
//! 拥有覆盖全部目录键的完整映射，要么没有条目，不存在部分条目。
//! 缓存只驻留内存，生命周期与会话相同，没有淘汰和过期。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

// ============================================================================
// 核心类型
// ============================================================================

/// 单个语言的缓存条目：完整的键到译文映射
#[derive(Debug, Clone)]
pub struct CacheEntry {
    values: HashMap<String, String>,
    installed_at: Instant,
}

impl CacheEntry {
    fn new(values: HashMap<String, String>) -> Self {
        Self {
            values,
            installed_at: Instant::now(),
        }
    }

    /// 条目内的译文数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 条目是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 条目安装时刻
    pub fn installed_at(&self) -> Instant {
        self.installed_at
    }
}

/// 翻译缓存
pub struct TranslationCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    stats: CacheStats,
}

// ============================================================================
// 实现
// ============================================================================

impl TranslationCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: CacheStats::default(),
        }
    }

    /// 某语言是否已有完整条目
    pub fn has(&self, lang: &str) -> bool {
        self.entries.read().unwrap().contains_key(lang)
    }

    /// 查询某语言下某个目录键的译文
    ///
    /// 语言没有条目或条目中没有该键都算未命中，由调用方回退到
    /// 基准语言文案。
    pub fn get(&self, lang: &str, key: &str) -> Option<String> {
        self.stats.record_request();

        let entries = self.entries.read().unwrap();
        match entries.get(lang).and_then(|entry| entry.values.get(key)) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// 原子地安装某语言的完整映射，替换旧条目
    pub fn put(&self, lang: &str, values: HashMap<String, String>) {
        let count = values.len();
        let replaced = self
            .entries
            .write()
            .unwrap()
            .insert(lang.to_string(), CacheEntry::new(values))
            .is_some();
        self.stats.record_install();

        if replaced {
            tracing::info!("缓存条目已替换 [{}]: {} 条文案", lang, count);
        } else {
            tracing::info!("缓存条目已安装 [{}]: {} 条文案", lang, count);
        }
    }

    /// 枚举已缓存的语言
    pub fn languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self.entries.read().unwrap().keys().cloned().collect();
        langs.sort_unstable();
        langs
    }

    /// 某语言条目的译文数量
    pub fn entry_len(&self, lang: &str) -> Option<usize> {
        self.entries.read().unwrap().get(lang).map(|entry| entry.len())
    }

    /// 已缓存的语言数量
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
        tracing::info!("翻译缓存已清空");
    }

    /// 获取统计快照
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 统计信息
// ============================================================================

/// 缓存统计信息
#[derive(Debug, Default)]
pub struct CacheStats {
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    installs: AtomicU64,
}

impl CacheStats {
    fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_install(&self) {
        self.installs.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成统计快照
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let hit_rate = if total_requests > 0 {
            cache_hits as f64 / total_requests as f64
        } else {
            0.0
        };

        CacheStatsSnapshot {
            total_requests,
            cache_hits,
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            installs: self.installs.load(Ordering::Relaxed),
            hit_rate,
        }
    }
}

/// 缓存统计快照
#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub installs: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mapping() -> HashMap<String, String> {
        let mut values = HashMap::new();
        values.insert("greeting".to_string(), "Hola".to_string());
        values.insert("title".to_string(), "Título".to_string());
        values
    }

    #[test]
    fn test_put_and_get() {
        let cache = TranslationCache::new();
        assert!(!cache.has("es"));

        cache.put("es", sample_mapping());

        assert!(cache.has("es"));
        assert_eq!(cache.get("es", "greeting"), Some("Hola".to_string()));
        assert_eq!(cache.entry_len("es"), Some(2));
    }

    #[test]
    fn test_miss_on_unknown_language_or_key() {
        let cache = TranslationCache::new();
        cache.put("es", sample_mapping());

        // 未缓存的语言
        assert_eq!(cache.get("fr", "greeting"), None);
        // 条目中不存在的键
        assert_eq!(cache.get("es", "missing"), None);

        let stats = cache.stats();
        assert_eq!(stats.cache_misses, 2);
    }

    #[test]
    fn test_put_replaces_whole_entry() {
        let cache = TranslationCache::new();
        cache.put("es", sample_mapping());

        let mut replacement = HashMap::new();
        replacement.insert("greeting".to_string(), "Buenas".to_string());
        cache.put("es", replacement);

        // 替换是整体的：旧条目的其他键一并消失
        assert_eq!(cache.get("es", "greeting"), Some("Buenas".to_string()));
        assert_eq!(cache.get("es", "title"), None);
        assert_eq!(cache.stats().installs, 2);
    }

    #[test]
    fn test_languages_enumeration() {
        let cache = TranslationCache::new();
        cache.put("fr", sample_mapping());
        cache.put("es", sample_mapping());

        assert_eq!(cache.languages(), vec!["es", "fr"]);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hit_rate() {
        let cache = TranslationCache::new();
        cache.put("es", sample_mapping());

        cache.get("es", "greeting");
        cache.get("es", "missing");

        let stats = cache.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert!((stats.hit_rate - 0.5).abs() < f64::EPSILON);
    }
}
