//! 批量翻译
//!
//! 将一组文案严格串行地逐条送往获取器：任何时刻只有一个远程调用在
//! 进行，相邻调用之间保持固定间隔。输出与输入等长且位置一一对应，
//! 中途的单条失败不会中断批次（失败位置由获取器降级为原文）。

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::fetcher::TranslationFetcher;

/// 批量翻译器
pub struct BatchTranslator {
    fetcher: Arc<TranslationFetcher>,
    delay: Duration,
    stats: BatchStats,
}

impl BatchTranslator {
    /// 创建批量翻译器，`delay` 为相邻调用之间的间隔
    pub fn new(fetcher: Arc<TranslationFetcher>, delay: Duration) -> Self {
        Self {
            fetcher,
            delay,
            stats: BatchStats::default(),
        }
    }

    /// 按输入顺序翻译全部文案
    ///
    /// 返回值与输入等长，第 i 项对应输入的第 i 项。
    pub async fn translate_all(&self, texts: &[String], target_lang: &str) -> Vec<String> {
        if texts.is_empty() {
            return Vec::new();
        }

        tracing::info!("开始批量翻译 [{}]: {} 条文案", target_lang, texts.len());
        let started = Instant::now();

        let mut results = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            let translated = self.fetcher.fetch(text, target_lang).await;
            results.push(translated);

            // 最后一次调用之后不再等待
            if i < texts.len() - 1 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let elapsed = started.elapsed();
        self.stats.record_batch(texts.len(), elapsed);
        tracing::info!(
            "批量翻译完成 [{}]: {} 条，耗时 {:?}",
            target_lang,
            results.len(),
            elapsed
        );

        results
    }

    /// 配置的调用间隔
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 获取统计快照
    pub fn stats(&self) -> BatchStatsSnapshot {
        self.stats.snapshot()
    }
}

/// 批量翻译统计信息
#[derive(Debug, Default)]
pub struct BatchStats {
    batches: AtomicUsize,
    texts_processed: AtomicUsize,
    total_time_ms: AtomicU64,
}

impl BatchStats {
    fn record_batch(&self, texts: usize, elapsed: Duration) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.texts_processed.fetch_add(texts, Ordering::Relaxed);
        self.total_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    /// 生成统计快照
    pub fn snapshot(&self) -> BatchStatsSnapshot {
        let batches = self.batches.load(Ordering::Relaxed);
        let total_time_ms = self.total_time_ms.load(Ordering::Relaxed);
        let avg_batch_ms = if batches > 0 {
            total_time_ms as f64 / batches as f64
        } else {
            0.0
        };

        BatchStatsSnapshot {
            batches,
            texts_processed: self.texts_processed.load(Ordering::Relaxed),
            total_time_ms,
            avg_batch_ms,
        }
    }
}

/// 批量翻译统计快照
#[derive(Debug, Clone)]
pub struct BatchStatsSnapshot {
    pub batches: usize,
    pub texts_processed: usize,
    pub total_time_ms: u64,
    pub avg_batch_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{TranslationError, TranslationResult};
    use crate::fetcher::TranslationEndpoint;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 可指定失败文本的记录型端点
    struct ScriptedEndpoint {
        fail_on: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedEndpoint {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                fail_on: fail_on.map(|s| s.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslationEndpoint for ScriptedEndpoint {
        async fn translate(
            &self,
            text: &str,
            _source_lang: &str,
            target_lang: &str,
        ) -> TranslationResult<String> {
            self.calls.lock().unwrap().push(text.to_string());

            if self.fail_on.as_deref() == Some(text) {
                return Err(TranslationError::ApiError {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(format!("{}:{}", target_lang, text))
        }
    }

    fn batch_with(endpoint: Arc<ScriptedEndpoint>, delay_ms: u64) -> BatchTranslator {
        let fetcher = Arc::new(TranslationFetcher::new(endpoint, "en"));
        BatchTranslator::new(fetcher, Duration::from_millis(delay_ms))
    }

    #[tokio::test]
    async fn test_sequential_in_input_order() {
        let endpoint = Arc::new(ScriptedEndpoint::new(None));
        let batch = batch_with(endpoint.clone(), 0);

        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = batch.translate_all(&texts, "es").await;

        assert_eq!(results, vec!["es:a", "es:b", "es:c"]);
        // 调用顺序与输入顺序一致
        assert_eq!(endpoint.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_middle_failure_preserves_positions() {
        let endpoint = Arc::new(ScriptedEndpoint::new(Some("b")));
        let batch = batch_with(endpoint.clone(), 0);

        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = batch.translate_all(&texts, "es").await;

        // 失败位置保留原文，其余位置保留译文，长度不变
        assert_eq!(results, vec!["es:a", "b", "es:c"]);
        // 失败不会中断批次
        assert_eq!(endpoint.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let endpoint = Arc::new(ScriptedEndpoint::new(None));
        let batch = batch_with(endpoint.clone(), 0);

        let results = batch.translate_all(&[], "es").await;
        assert!(results.is_empty());
        assert!(endpoint.calls().is_empty());
        assert_eq!(batch.stats().batches, 0);
    }

    #[tokio::test]
    async fn test_delay_between_calls() {
        let endpoint = Arc::new(ScriptedEndpoint::new(None));
        let batch = batch_with(endpoint.clone(), 10);

        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let started = Instant::now();
        batch.translate_all(&texts, "es").await;

        // 三条文案之间有两次间隔
        assert!(
            started.elapsed() >= Duration::from_millis(20),
            "batch should pace consecutive calls"
        );
    }

    #[tokio::test]
    async fn test_stats_snapshot() {
        let endpoint = Arc::new(ScriptedEndpoint::new(None));
        let batch = batch_with(endpoint, 0);

        let texts = vec!["a".to_string(), "b".to_string()];
        batch.translate_all(&texts, "fr").await;

        let stats = batch.stats();
        assert_eq!(stats.batches, 1);
        assert_eq!(stats.texts_processed, 2);
    }
}
