//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, TranslationConfig};

/// 配置常量
pub mod constants {
    /// 批量翻译中相邻两次调用之间的间隔毫秒数
    pub const BATCH_DELAY_MS: u64 = 100;

    /// 调用间隔的上限（配置验证用）
    pub const MAX_BATCH_DELAY_MS: u64 = 10_000;

    /// 默认API设置
    pub const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";
    pub const DEFAULT_BASE_LANG: &str = "en";

    /// 可用性探测使用的文本和目标语言
    pub const PROBE_TEXT: &str = "test";
    pub const PROBE_TARGET_LANG: &str = "es";

    /// 日志中文本预览的最大字符数
    pub const PREVIEW_MAX_CHARS: usize = 50;

    /// 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "interface-translator.toml",
        "config.toml",
        ".interface-translator.toml",
        "~/.config/interface-translator/config.toml",
        "/etc/interface-translator/config.toml",
    ];
}

/// 便利函数
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| std::path::Path::new(shellexpand::tilde(path).as_ref()).exists())
}
