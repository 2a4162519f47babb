//! # Interface Translator
//!
//! 固定文案目录界面的翻译编排与缓存层。界面以基准语言编写文案目录，
//! 用户切换语言时，本库通过第三方翻译端点串行翻译整个目录，按语言
//! 缓存完整结果，并保证任何故障下界面文案都能解析出可用的值。
//!
//! ## 模块组织
//!
//! - `catalog` - 界面文案目录（键到基准文案的有序映射）
//! - `language` - 支持的语言集合
//! - `fetcher` - 单次远程翻译调用与原文降级
//! - `batch` - 严格串行的批量翻译
//! - `cache` - 按语言的完整译文缓存
//! - `session` - 语言会话控制器（状态机与可用性门控）
//! - `config` - 配置管理
//! - `env` - 类型安全的环境变量
//! - `error` - 统一错误处理
//!
//! ## 组件依赖关系
//!
//! ```text
//! LanguageSession (session.rs)
//!     ├── Catalog (catalog.rs)
//!     ├── BatchTranslator (batch.rs)
//!     │       └── TranslationFetcher (fetcher.rs)
//!     │               └── TranslationEndpoint (fetcher.rs)
//!     ├── TranslationCache (cache.rs)
//!     └── ConfigManager (config/manager.rs)
//! ```

pub mod batch;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod env;
pub mod error;
pub mod fetcher;
pub mod language;
pub mod session;

// ============================================================================
// 核心API导出 - 主要的公共接口
// ============================================================================

/// 语言会话控制器相关组件
///
/// - `LanguageSession`: 主控制器，提供切换、查找和动态翻译
/// - `SessionState`: 会话状态（Idle / Translating）
/// - `SwitchOutcome`: 切换结果
pub use session::{
    LanguageSession, SessionState, SessionStats, SessionStatsSnapshot, SwitchOutcome,
};

/// 数据模型
pub use catalog::{Catalog, CatalogEntry};
pub use language::{find_language, is_supported, Language, SUPPORTED_LANGUAGES};

/// 翻译执行组件
pub use batch::{BatchStats, BatchStatsSnapshot, BatchTranslator};
pub use fetcher::{
    DeeplEndpoint, FetcherStats, FetcherStatsSnapshot, TranslationEndpoint, TranslationFetcher,
};

/// 缓存组件
pub use cache::{TranslationCache, CacheStats, CacheStatsSnapshot};

/// 配置管理相关组件
pub use config::{ConfigManager, TranslationConfig};

/// 错误处理相关组件
pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

// ============================================================================
// 模块信息和元数据
// ============================================================================

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 运行库自检
///
/// 验证内置数据和默认装配的一致性，不发起任何网络请求。
pub fn self_check() -> TranslationResult<()> {
    tracing::info!("开始自检...");

    // 检查内置目录
    let catalog = Catalog::builtin();
    if catalog.is_empty() {
        return Err(TranslationError::InternalError(
            "内置目录为空".to_string(),
        ));
    }
    if catalog.len() != catalog.keys().count() {
        return Err(TranslationError::InternalError(
            "内置目录键不唯一".to_string(),
        ));
    }
    tracing::debug!("✓ 内置目录正常 ({} 条文案)", catalog.len());

    // 检查默认配置
    let config = TranslationConfig::default();
    config.validate()?;
    tracing::debug!("✓ 默认配置正常");

    // 检查语言集合
    if !language::is_supported(&config.base_lang) {
        return Err(TranslationError::InternalError(
            "默认基准语言不在支持集合内".to_string(),
        ));
    }
    tracing::debug!("✓ 语言集合正常 ({} 种语言)", SUPPORTED_LANGUAGES.len());

    // 检查缓存读写
    let cache = TranslationCache::new();
    let mut mapping = std::collections::HashMap::new();
    mapping.insert("probe".to_string(), "prueba".to_string());
    cache.put("es", mapping);
    if cache.get("es", "probe").as_deref() != Some("prueba") {
        return Err(TranslationError::InternalError(
            "缓存读写异常".to_string(),
        ));
    }
    tracing::debug!("✓ 缓存读写正常");

    tracing::info!("自检完成，所有组件正常");
    Ok(())
}

/// 库初始化
pub fn init() {
    tracing::info!("interface-translator v{} 已加载", VERSION);
}
