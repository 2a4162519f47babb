//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::error::{TranslationError, TranslationResult};
use crate::language;

/// 翻译配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// 目录文案的基准语言（ISO 639-1）
    pub base_lang: String,
    /// 翻译API端点
    pub api_url: String,
    /// API鉴权密钥，留空表示不发送鉴权头
    ///
    /// 真实密钥只通过环境变量或 .env 文件注入，不写入配置文件。
    pub api_key: String,
    /// 批量翻译的调用间隔（毫秒）
    pub batch_delay_ms: u64,
    /// 是否要求API保留文本格式
    pub preserve_formatting: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_lang: constants::DEFAULT_BASE_LANG.to_string(),
            api_url: constants::DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            batch_delay_ms: constants::BATCH_DELAY_MS,
            preserve_formatting: true,
        }
    }
}

impl TranslationConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        if !language::is_supported(&self.base_lang) {
            return Err(TranslationError::ConfigError(format!(
                "基准语言不在支持集合内: {}",
                self.base_lang
            )));
        }

        if self.api_url.is_empty() {
            return Err(TranslationError::ConfigError(
                "API URL不能为空".to_string(),
            ));
        }

        if self.batch_delay_ms > constants::MAX_BATCH_DELAY_MS {
            return Err(TranslationError::ConfigError(format!(
                "调用间隔过长: {}ms (上限 {}ms)",
                self.batch_delay_ms,
                constants::MAX_BATCH_DELAY_MS
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    ///
    /// 只有确实设置了的变量才会覆盖已加载的值，解析失败的值
    /// 记入日志后忽略。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::translation;

        env_override::<_, translation::ApiUrl>(&mut self.api_url, "api_url");
        env_override::<_, translation::ApiKey>(&mut self.api_key, "api_key");
        env_override::<_, translation::BaseLang>(&mut self.base_lang, "base_lang");
        env_override::<_, translation::BatchDelayMs>(&mut self.batch_delay_ms, "batch_delay_ms");
        env_override::<_, translation::PreserveFormatting>(
            &mut self.preserve_formatting,
            "preserve_formatting",
        );
    }

    /// 调用间隔转换为Duration
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// 变量已设置时用解析结果覆盖 `slot`
///
/// 带编译期默认值的变量在未设置时也能解析成功，这里先检查
/// 变量是否存在，避免默认值覆盖配置文件里的值。
fn env_override<T, V>(slot: &mut T, field: &str)
where
    V: crate::env::EnvVar<T>,
{
    if std::env::var(V::NAME).is_err() {
        return;
    }

    match V::get() {
        Ok(value) => {
            *slot = value;
            tracing::info!("环境变量覆盖 {}", field);
        }
        Err(e) => tracing::warn!("忽略无效的环境变量: {}", e),
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslationConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    ///
    /// 加载顺序：默认值 → 配置文件 → .env 文件 → 环境变量覆盖 → 验证。
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 基于加载结果创建带覆盖项的配置
    pub fn create_config(&self, api_url: Option<&str>) -> TranslationConfig {
        let mut config = self.config.clone();
        if let Some(url) = api_url {
            config.api_url = url.to_string();
        }
        config
    }

    /// 从文件加载配置
    fn load_config() -> TranslationResult<TranslationConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslationConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> TranslationResult<TranslationConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        // 尝试TOML格式
        if path.ends_with(".toml") {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        } else {
            // 尝试JSON格式
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env.development", ".env.production", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> TranslationResult<()> {
        let config = TranslationConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
