//! 语言会话演示
//!
//! 用一个本地伪翻译端点跑完整的切换流程，不需要网络和API密钥

use std::sync::Arc;

use async_trait::async_trait;

use interface_translator::{
    Catalog, LanguageSession, TranslationConfig, TranslationEndpoint, TranslationResult,
};

/// 本地伪翻译端点：把文本转成大写并标注目标语言
struct UppercaseEndpoint;

#[async_trait]
impl TranslationEndpoint for UppercaseEndpoint {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        Ok(format!("[{}] {}", target_lang, text.to_uppercase()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TranslationConfig {
        batch_delay_ms: 0,
        ..TranslationConfig::default()
    };
    let session = LanguageSession::new(Catalog::builtin(), Arc::new(UppercaseEndpoint), config)?;

    println!("=== 语言会话演示 ===\n");

    println!("支持的语言:");
    for lang in session.languages() {
        println!("   {} {} ({})", lang.flag, lang.name, lang.code);
    }

    println!("\n基准语言文案:");
    println!("   title = {}", session.lookup("title"));
    println!("   settings = {}", session.lookup("settings"));

    session.switch_language("es").await?;
    println!("\n切换到西班牙语后:");
    println!("   title = {}", session.lookup("title"));
    println!("   settings = {}", session.lookup("settings"));

    let adhoc = session
        .translate_text("Dynamic text outside the catalog")
        .await;
    println!("\n动态文本: {}", adhoc);

    let stats = session.fetcher_stats();
    println!(
        "\n端点调用: {} 次请求, {} 次探测",
        stats.requests, stats.probes
    );

    Ok(())
}
