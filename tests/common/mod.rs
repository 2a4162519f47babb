// 集成测试公共模块
//
// 提供可脚本化的模拟端点、会话构建工具和测量辅助

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use interface_translator::{
    Catalog, LanguageSession, TranslationConfig, TranslationEndpoint, TranslationError,
    TranslationResult,
};

// ============================================================================
// 模拟端点
// ============================================================================

/// 可脚本化的模拟翻译端点
///
/// 默认把文本改写为 `"{目标语言}:{原文}"`，便于断言翻译确实发生。
/// 支持固定回复、按原文触发失败、运行期故障开关和人为延迟。
pub struct MockEndpoint {
    calls: AtomicUsize,
    call_log: Mutex<Vec<String>>,
    replies: HashMap<String, String>,
    fail_texts: HashSet<String>,
    available: AtomicBool,
    latency: Option<Duration>,
}

impl MockEndpoint {
    /// 创建正常工作的模拟端点
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            call_log: Mutex::new(Vec::new()),
            replies: HashMap::new(),
            fail_texts: HashSet::new(),
            available: AtomicBool::new(true),
            latency: None,
        }
    }

    /// 创建处于故障状态的模拟端点，所有调用都失败
    pub fn unavailable() -> Self {
        let endpoint = Self::new();
        endpoint.available.store(false, Ordering::SeqCst);
        endpoint
    }

    /// 为指定原文配置固定回复
    pub fn with_reply(mut self, text: &str, reply: &str) -> Self {
        self.replies.insert(text.to_string(), reply.to_string());
        self
    }

    /// 配置遇到指定原文时失败
    pub fn with_failure_on(mut self, text: &str) -> Self {
        self.fail_texts.insert(text.to_string());
        self
    }

    /// 配置每次调用的人为延迟，制造真实的挂起点
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// 运行期切换端点的故障状态
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// 端点收到的调用总数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 按到达顺序记录的调用，格式为 `"{目标语言}:{原文}"`
    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationEndpoint for MockEndpoint {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_log
            .lock()
            .unwrap()
            .push(format!("{}:{}", target_lang, text));

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(TranslationError::RequestFailed(
                "模拟端点处于故障状态".to_string(),
            ));
        }

        if self.fail_texts.contains(text) {
            return Err(TranslationError::RequestFailed(format!(
                "模拟端点拒绝翻译: {}",
                text
            )));
        }

        match self.replies.get(text) {
            Some(reply) => Ok(reply.clone()),
            None => Ok(format!("{}:{}", target_lang, text)),
        }
    }
}

// ============================================================================
// 会话构建
// ============================================================================

/// 三条文案的小目录，便于精确断言调用次数
pub fn test_catalog() -> Catalog {
    Catalog::from_entries([
        ("greeting", "Hello"),
        ("farewell", "Goodbye"),
        ("settings", "Settings"),
    ])
    .expect("test catalog keys are unique")
}

/// 零批次延迟的测试配置
pub fn test_config() -> TranslationConfig {
    TranslationConfig {
        batch_delay_ms: 0,
        ..TranslationConfig::default()
    }
}

/// 用小目录和模拟端点构建会话
pub fn test_session(endpoint: Arc<MockEndpoint>) -> LanguageSession {
    LanguageSession::new(test_catalog(), endpoint, test_config())
        .expect("session construction should succeed")
}

// ============================================================================
// 测量辅助
// ============================================================================

/// 性能测量工具
pub struct PerformanceHelper;

impl PerformanceHelper {
    /// 测量异步操作的耗时
    pub async fn measure_async_time<F, Fut, T>(operation: F) -> (T, Duration)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let start = Instant::now();
        let result = operation().await;
        (result, start.elapsed())
    }
}
