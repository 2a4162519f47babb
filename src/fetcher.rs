//! 翻译获取器
//!
//! 封装单次远程翻译调用。每次调用只发起一次远程尝试，
//! 任何失败（网络、非2xx状态、响应格式错误）都降级为返回原文，
//! 保证界面在翻译服务故障时仍然可用。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::constants;
use crate::config::TranslationConfig;
use crate::error::{TranslationError, TranslationResult};

/// 远程翻译端点抽象
///
/// 语言代码使用小写 ISO-639-1；线路格式由具体实现决定。
#[async_trait]
pub trait TranslationEndpoint: Send + Sync {
    /// 将一段文本从源语言翻译到目标语言
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;
}

/// DeepL v2 表单协议端点
///
/// 请求为 `application/x-www-form-urlencoded` 的 POST，
/// 语言代码在线路上转为大写，鉴权使用 `DeepL-Auth-Key` 头。
pub struct DeeplEndpoint {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    preserve_formatting: bool,
}

#[derive(Debug, Deserialize)]
struct DeeplResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeeplTranslation {
    text: String,
}

impl DeeplEndpoint {
    /// 创建端点
    pub fn new(api_url: &str, api_key: &str, preserve_formatting: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            preserve_formatting,
        }
    }

    /// 从配置创建端点
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(&config.api_url, &config.api_key, config.preserve_formatting)
    }
}

#[async_trait]
impl TranslationEndpoint for DeeplEndpoint {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let source = source_lang.to_uppercase();
        let target = target_lang.to_uppercase();
        let preserve = if self.preserve_formatting { "1" } else { "0" };

        let mut request = self.client.post(&self.api_url).form(&[
            ("text", text),
            ("source_lang", source.as_str()),
            ("target_lang", target.as_str()),
            ("preserve_formatting", preserve),
        ]);

        if !self.api_key.is_empty() {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("DeepL-Auth-Key {}", self.api_key),
            );
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: preview(&message),
            });
        }

        let body = response.text().await?;
        let parsed: DeeplResponse = serde_json::from_str(&body)?;

        parsed
            .translations
            .into_iter()
            .next()
            .map(|translation| translation.text)
            .ok_or_else(|| {
                TranslationError::InvalidResponse("响应中没有翻译结果".to_string())
            })
    }
}

/// 翻译获取器：带原文降级的单次调用封装
pub struct TranslationFetcher {
    endpoint: Arc<dyn TranslationEndpoint>,
    source_lang: String,
    stats: FetcherStats,
}

impl TranslationFetcher {
    /// 创建获取器，`source_lang` 为目录的基准语言
    pub fn new(endpoint: Arc<dyn TranslationEndpoint>, source_lang: &str) -> Self {
        Self {
            endpoint,
            source_lang: source_lang.to_string(),
            stats: FetcherStats::default(),
        }
    }

    /// 翻译一段文本，失败时返回原文
    ///
    /// 每次调用只发起一次远程尝试，不做重试。
    pub async fn fetch(&self, text: &str, target_lang: &str) -> String {
        self.stats.record_request(text);
        tracing::debug!("发起翻译请求 [{}]: {}", target_lang, preview(text));

        match self
            .endpoint
            .translate(text, &self.source_lang, target_lang)
            .await
        {
            Ok(translated) => {
                self.stats.record_success(&translated);
                tracing::debug!("翻译成功 [{}]: {}", target_lang, preview(&translated));
                translated
            }
            Err(e) => {
                self.stats.record_fallback();
                tracing::warn!("翻译失败，返回原文 [{}]: {}", target_lang, e);
                text.to_string()
            }
        }
    }

    /// 可用性探测：发起一次试探性翻译调用
    pub async fn probe(&self, target_lang: &str) -> bool {
        self.stats.record_probe();
        tracing::debug!("发起可用性探测 [{}]", target_lang);

        match self
            .endpoint
            .translate(constants::PROBE_TEXT, &self.source_lang, target_lang)
            .await
        {
            Ok(_) => {
                tracing::info!("翻译服务可用性探测通过");
                true
            }
            Err(e) => {
                tracing::warn!("翻译服务可用性探测失败: {}", e);
                false
            }
        }
    }

    /// 基准语言代码
    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    /// 获取统计快照
    pub fn stats(&self) -> FetcherStatsSnapshot {
        self.stats.snapshot()
    }
}

/// 获取器统计信息
#[derive(Debug, Default)]
pub struct FetcherStats {
    requests: AtomicUsize,
    fallbacks: AtomicUsize,
    probes: AtomicUsize,
    characters_in: AtomicUsize,
    characters_out: AtomicUsize,
}

impl FetcherStats {
    fn record_request(&self, text: &str) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.characters_in
            .fetch_add(text.chars().count(), Ordering::Relaxed);
    }

    fn record_success(&self, translated: &str) {
        self.characters_out
            .fetch_add(translated.chars().count(), Ordering::Relaxed);
    }

    fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    fn record_probe(&self) {
        self.probes.fetch_add(1, Ordering::Relaxed);
    }

    /// 生成统计快照
    pub fn snapshot(&self) -> FetcherStatsSnapshot {
        let requests = self.requests.load(Ordering::Relaxed);
        let fallbacks = self.fallbacks.load(Ordering::Relaxed);
        let fallback_rate = if requests > 0 {
            fallbacks as f64 / requests as f64
        } else {
            0.0
        };

        FetcherStatsSnapshot {
            requests,
            fallbacks,
            probes: self.probes.load(Ordering::Relaxed),
            characters_in: self.characters_in.load(Ordering::Relaxed),
            characters_out: self.characters_out.load(Ordering::Relaxed),
            fallback_rate,
        }
    }
}

/// 获取器统计快照
#[derive(Debug, Clone)]
pub struct FetcherStatsSnapshot {
    pub requests: usize,
    pub fallbacks: usize,
    pub probes: usize,
    pub characters_in: usize,
    pub characters_out: usize,
    pub fallback_rate: f64,
}

/// 日志用文本预览，超长部分截断
pub(crate) fn preview(text: &str) -> String {
    let mut shortened: String = text.chars().take(constants::PREVIEW_MAX_CHARS).collect();
    if text.chars().count() > constants::PREVIEW_MAX_CHARS {
        shortened.push_str("...");
    }
    shortened
}
