//! 语言会话控制器
//!
//! 本模块是翻译系统的主要入口点，负责驱动语言切换状态机，
//! 协调获取器、批量翻译器和缓存的工作。
//!
//! ## 设计理念
//!
//! 1. **显式状态机**: 会话状态只有 `Idle` 和 `Translating` 两种，转换集中在切换流程内
//! 2. **串行切换**: 异步互斥锁保证同一会话任何时刻至多一次切换在进行，重入调用排队执行
//! 3. **一次性探测**: 端点可用性在会话生命周期内只探测一次，结果门控所有后续切换
//! 4. **失败回滚**: 切换失败时状态回到切换前的语言，缓存不会留下部分条目
//! 5. **查找不失败**: 字符串查找是全函数，翻译层故障只会降级为基准语言文案
//!
//! ## 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use interface_translator::{Catalog, DeeplEndpoint, LanguageSession, TranslationConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TranslationConfig::default();
//! let endpoint = Arc::new(DeeplEndpoint::from_config(&config));
//! let session = LanguageSession::new(Catalog::builtin(), endpoint, config)?;
//!
//! // 启动时探测翻译服务可用性
//! session.probe_endpoint().await;
//!
//! // 切换界面语言并读取文案
//! session.switch_language("es").await?;
//! println!("{}", session.lookup("greeting"));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::batch::{BatchStatsSnapshot, BatchTranslator};
use crate::cache::{CacheStatsSnapshot, TranslationCache};
use crate::catalog::Catalog;
use crate::config::constants;
use crate::config::{ConfigManager, TranslationConfig};
use crate::error::{helpers, TranslationError, TranslationResult};
use crate::fetcher::{DeeplEndpoint, FetcherStatsSnapshot, TranslationEndpoint, TranslationFetcher};
use crate::language::{self, Language};

// ============================================================================
// 状态类型
// ============================================================================

/// 会话状态
///
/// `active` 始终是最近一次完整解析的语言：处于 `Translating` 时
/// 查找仍然按 `active` 解析，直到切换成功才推进。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 界面稳定，所有查找按 `active` 解析
    Idle { active: String },
    /// 正在切换到 `target`，`active` 仍为上一个完整解析的语言
    Translating { active: String, target: String },
}

impl SessionState {
    /// 当前生效的语言代码
    pub fn active(&self) -> &str {
        match self {
            SessionState::Idle { active } => active,
            SessionState::Translating { active, .. } => active,
        }
    }

    /// 是否有切换正在进行
    pub fn is_translating(&self) -> bool {
        matches!(self, SessionState::Translating { .. })
    }
}

/// 语言切换的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// 目标语言就是当前语言，什么都没有发生
    AlreadyActive,
    /// 切换完成；`newly_translated` 表示本次是否发生了远程批量翻译
    Switched { newly_translated: bool },
}

// ============================================================================
// 会话控制器
// ============================================================================

/// 语言会话控制器
///
/// 持有目录、获取器、批量翻译器和缓存，对外提供语言切换、
/// 文案查找和临时文本翻译三类操作。所有方法都通过共享引用调用，
/// 会话可以放进 `Arc` 在查找方和切换方之间共享。
pub struct LanguageSession {
    /// 界面文案目录，基准语言的唯一数据源
    catalog: Catalog,

    /// 翻译获取器，封装单次远程调用和原文降级
    fetcher: Arc<TranslationFetcher>,

    /// 批量翻译器，串行翻译整个目录
    batch: BatchTranslator,

    /// 按语言的完整译文缓存
    cache: TranslationCache,

    /// 会话配置
    config: TranslationConfig,

    /// 当前会话状态
    state: RwLock<SessionState>,

    /// 端点可用性探测结果，`None` 表示尚未探测
    availability: RwLock<Option<bool>>,

    /// 切换串行化锁：重入的切换调用在此排队
    switch_guard: tokio::sync::Mutex<()>,

    /// 探测串行化锁：并发的首次探测合并为一次远程调用
    probe_guard: tokio::sync::Mutex<()>,

    /// 会话统计信息
    stats: SessionStats,
}

impl LanguageSession {
    /// 创建新的语言会话
    ///
    /// 校验配置后以 `Idle(基准语言)` 状态启动。端点可用性此时
    /// 尚未探测，首次需要门控的切换会触发探测。
    ///
    /// # 错误
    ///
    /// 配置无效（基准语言不在支持集合内、API地址为空等）时返回配置错误。
    pub fn new(
        catalog: Catalog,
        endpoint: Arc<dyn TranslationEndpoint>,
        config: TranslationConfig,
    ) -> TranslationResult<Self> {
        config.validate()?;

        let fetcher = Arc::new(TranslationFetcher::new(endpoint, &config.base_lang));
        let batch = BatchTranslator::new(Arc::clone(&fetcher), config.batch_delay());
        let initial_state = SessionState::Idle {
            active: config.base_lang.clone(),
        };

        tracing::info!(
            "语言会话已创建: 基准语言 [{}], 目录 {} 条文案",
            config.base_lang,
            catalog.len()
        );

        Ok(Self {
            catalog,
            fetcher,
            batch,
            cache: TranslationCache::new(),
            config,
            state: RwLock::new(initial_state),
            availability: RwLock::new(None),
            switch_guard: tokio::sync::Mutex::new(()),
            probe_guard: tokio::sync::Mutex::new(()),
            stats: SessionStats::default(),
        })
    }

    /// 创建使用默认装配的会话
    ///
    /// 内置目录 + DeepL端点 + 配置管理器加载的配置。
    pub fn create_default() -> TranslationResult<Self> {
        let manager = ConfigManager::new()?;
        let config = manager.get_config().clone();
        let endpoint = Arc::new(DeeplEndpoint::from_config(&config));

        Self::new(Catalog::builtin(), endpoint, config)
    }

    // ------------------------------------------------------------------
    // 可用性探测
    // ------------------------------------------------------------------

    /// 探测端点可用性（每个会话只探测一次）
    ///
    /// 首次调用发起一次试探性翻译，之后的调用直接返回记忆的结果；
    /// 并发的首次调用合并为一次远程请求。探测结果门控所有需要
    /// 远程翻译的切换，之后不会自动重新探测。
    pub async fn probe_endpoint(&self) -> bool {
        if let Some(known) = *self.availability.read().unwrap() {
            return known;
        }

        let _guard = self.probe_guard.lock().await;

        // 等锁期间其他调用可能已经完成探测
        if let Some(known) = *self.availability.read().unwrap() {
            return known;
        }

        let available = self.fetcher.probe(self.probe_target()).await;
        *self.availability.write().unwrap() = Some(available);
        available
    }

    /// 按用户要求重新探测端点
    ///
    /// 覆盖之前记忆的探测结果。只应由显式的用户动作触发，
    /// 控制器自身永远不会调用它。
    pub async fn recheck_endpoint(&self) -> bool {
        let _guard = self.probe_guard.lock().await;

        let available = self.fetcher.probe(self.probe_target()).await;
        *self.availability.write().unwrap() = Some(available);
        tracing::info!(
            "端点重新探测完成: {}",
            if available { "可用" } else { "不可用" }
        );

        available
    }

    /// 已知的端点可用性，`None` 表示尚未探测
    pub fn endpoint_available(&self) -> Option<bool> {
        *self.availability.read().unwrap()
    }

    /// 探测使用的目标语言，避开基准语言
    fn probe_target(&self) -> &'static str {
        if constants::PROBE_TARGET_LANG != self.config.base_lang {
            return constants::PROBE_TARGET_LANG;
        }

        language::SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| lang.code)
            .find(|code| *code != self.config.base_lang)
            .unwrap_or(constants::PROBE_TARGET_LANG)
    }

    // ------------------------------------------------------------------
    // 语言切换
    // ------------------------------------------------------------------

    /// 切换界面语言
    ///
    /// 完整流程：
    ///
    /// 1. 目标语言不在支持集合内，直接拒绝
    /// 2. 目标与当前语言相同，无操作返回
    /// 3. 目标为基准语言，直接转到 `Idle(基准语言)`，不发起远程调用
    /// 4. 可用性门控：探测结论为不可用时返回面向用户的错误，状态不变
    /// 5. 进入 `Translating`；缓存命中时跳过翻译，否则串行批量翻译
    ///    全部目录文案并整体安装缓存条目
    /// 6. 转到 `Idle(目标语言)`
    ///
    /// 第5步中的任何意外失败都会被捕获：状态回到切换前的语言，
    /// 缓存不会留下部分条目，错误原样返回给调用方展示。
    ///
    /// 同一会话上并发的切换调用会排队串行执行，效果等价于
    /// 按某个顺序依次调用。
    pub async fn switch_language(&self, target: &str) -> TranslationResult<SwitchOutcome> {
        if !language::is_supported(target) {
            self.stats.inc_switches_rejected();
            return helpers::log_error(TranslationError::UnsupportedLanguage(
                target.to_string(),
            ));
        }

        let _guard = self.switch_guard.lock().await;

        let active = self.active_language();
        if target == active {
            tracing::debug!("目标语言与当前语言相同 [{}]，忽略切换", target);
            return Ok(SwitchOutcome::AlreadyActive);
        }

        // 基准语言无需翻译，也不经过可用性门控
        if target == self.config.base_lang {
            self.set_state(SessionState::Idle {
                active: target.to_string(),
            });
            self.stats.inc_switches_completed();
            tracing::info!("切换到基准语言 [{}]", target);
            return Ok(SwitchOutcome::Switched {
                newly_translated: false,
            });
        }

        if !self.probe_endpoint().await {
            self.stats.inc_switches_rejected();
            tracing::warn!("翻译服务不可用，保持当前语言 [{}]", active);
            return Err(TranslationError::EndpointUnavailable);
        }

        let started = Instant::now();
        self.set_state(SessionState::Translating {
            active: active.clone(),
            target: target.to_string(),
        });
        tracing::info!("开始语言切换: {} -> {}", active, target);

        match self.populate_cache(target).await {
            Ok(newly_translated) => {
                self.set_state(SessionState::Idle {
                    active: target.to_string(),
                });
                self.stats.inc_switches_completed();
                self.stats.add_processing_time(started.elapsed());
                tracing::info!(
                    "语言切换完成: {} -> {} ({})",
                    active,
                    target,
                    if newly_translated {
                        "远程翻译"
                    } else {
                        "缓存命中"
                    }
                );
                Ok(SwitchOutcome::Switched { newly_translated })
            }
            Err(e) => {
                // 回滚到切换前的语言
                self.set_state(SessionState::Idle {
                    active: active.clone(),
                });
                self.stats.inc_switches_failed();
                tracing::error!("语言切换失败，回滚到 [{}]: {}", active, e);
                Err(e)
            }
        }
    }

    /// 确保目标语言有完整的缓存条目
    ///
    /// 返回是否发生了远程批量翻译。
    async fn populate_cache(&self, target: &str) -> TranslationResult<bool> {
        if self.cache.has(target) {
            tracing::debug!("缓存命中 [{}]，跳过远程翻译", target);
            return Ok(false);
        }

        let base_texts = self.catalog.base_texts();
        let translated = self.batch.translate_all(&base_texts, target).await;

        if translated.len() != self.catalog.len() {
            return Err(helpers::internal_error(format!(
                "批量结果数量不一致: {} != {}",
                translated.len(),
                self.catalog.len()
            )));
        }

        let mapping: HashMap<String, String> = self
            .catalog
            .keys()
            .map(str::to_string)
            .zip(translated)
            .collect();
        self.cache.put(target, mapping);

        Ok(true)
    }

    // ------------------------------------------------------------------
    // 文案解析
    // ------------------------------------------------------------------

    /// 按当前语言解析目录键
    ///
    /// 全函数：基准语言直接取目录文案；其他语言取缓存译文，
    /// 未命中时回退到基准语言文案；目录中不存在的键返回键本身。
    /// 翻译层的任何故障都不会让查找返回空字符串。
    pub fn lookup(&self, key: &str) -> String {
        let active = self.active_language();

        // 基准语言永远直接从目录解析，不经过缓存
        if active == self.config.base_lang {
            return self.base_value(key);
        }

        match self.cache.get(&active, key) {
            Some(value) => value,
            None => self.base_value(key),
        }
    }

    /// 目录基准文案，不存在的键回退为键本身
    fn base_value(&self, key: &str) -> String {
        self.catalog
            .get(key)
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// 翻译一段目录之外的动态文本
    ///
    /// 不读写缓存：基准语言生效或端点未探测/不可用时原样返回，
    /// 否则发起一次远程调用（失败降级为原文）。
    pub async fn translate_text(&self, text: &str) -> String {
        let active = self.active_language();

        if active == self.config.base_lang {
            return text.to_string();
        }

        // 未探测视同不可用
        if self.endpoint_available() != Some(true) {
            tracing::debug!("端点不可用，动态文本保持原文");
            return text.to_string();
        }

        self.stats.inc_adhoc_translations();
        self.fetcher.fetch(text, &active).await
    }

    // ------------------------------------------------------------------
    // 访问器
    // ------------------------------------------------------------------

    /// 当前生效的语言代码
    pub fn active_language(&self) -> String {
        self.state.read().unwrap().active().to_string()
    }

    /// 是否有切换正在进行
    pub fn is_translating(&self) -> bool {
        self.state.read().unwrap().is_translating()
    }

    /// 当前会话状态快照
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    /// 界面文案目录
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 支持的语言集合
    pub fn languages(&self) -> &'static [Language] {
        language::SUPPORTED_LANGUAGES
    }

    /// 会话配置
    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 会话统计快照
    pub fn stats(&self) -> SessionStatsSnapshot {
        self.stats.snapshot()
    }

    /// 缓存统计快照
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    /// 获取器统计快照
    pub fn fetcher_stats(&self) -> FetcherStatsSnapshot {
        self.fetcher.stats()
    }

    /// 批量翻译统计快照
    pub fn batch_stats(&self) -> BatchStatsSnapshot {
        self.batch.stats()
    }

    /// 已缓存的语言列表
    pub fn cached_languages(&self) -> Vec<String> {
        self.cache.languages()
    }

    fn set_state(&self, next: SessionState) {
        *self.state.write().unwrap() = next;
    }
}

// ============================================================================
// 统计信息
// ============================================================================

/// 会话统计信息
#[derive(Debug, Default)]
pub struct SessionStats {
    /// 完成的语言切换次数
    switches_completed: AtomicUsize,
    /// 被拒绝的切换次数（不支持的语言、端点不可用）
    switches_rejected: AtomicUsize,
    /// 失败后回滚的切换次数
    switches_failed: AtomicUsize,
    /// 动态文本翻译次数
    adhoc_translations: AtomicUsize,
    /// 切换累计耗时（微秒）
    processing_time: AtomicU64,
}

impl SessionStats {
    fn inc_switches_completed(&self) {
        self.switches_completed.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_switches_rejected(&self) {
        self.switches_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_switches_failed(&self) {
        self.switches_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_adhoc_translations(&self) {
        self.adhoc_translations.fetch_add(1, Ordering::Relaxed);
    }

    fn add_processing_time(&self, elapsed: Duration) {
        self.processing_time
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// 生成统计快照
    pub fn snapshot(&self) -> SessionStatsSnapshot {
        SessionStatsSnapshot {
            switches_completed: self.switches_completed.load(Ordering::Relaxed),
            switches_rejected: self.switches_rejected.load(Ordering::Relaxed),
            switches_failed: self.switches_failed.load(Ordering::Relaxed),
            adhoc_translations: self.adhoc_translations.load(Ordering::Relaxed),
            processing_time_micros: self.processing_time.load(Ordering::Relaxed),
        }
    }
}

/// 会话统计快照
#[derive(Debug, Clone)]
pub struct SessionStatsSnapshot {
    pub switches_completed: usize,
    pub switches_rejected: usize,
    pub switches_failed: usize,
    pub adhoc_translations: usize,
    pub processing_time_micros: u64,
}
