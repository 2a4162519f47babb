//! 环境变量系统演示
//!
//! 展示类型安全环境变量的读取、校验和默认值行为

use std::env;

use interface_translator::env::{core, translation, EnvVar};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 环境变量系统演示 ===\n");

    // 设置一些示例环境变量
    env::set_var("INTERFACE_TRANSLATOR_BASE_LANG", "es");
    env::set_var("INTERFACE_TRANSLATOR_BATCH_DELAY_MS", "250");

    // 1. 单独获取环境变量
    println!("1. 单独获取环境变量:");
    println!("   日志级别: {}", core::LogLevel::get()?);
    println!("   基准语言: {}", translation::BaseLang::get()?);
    println!("   批次间隔: {} ms", translation::BatchDelayMs::get()?);

    // 2. 解析校验
    println!("\n2. 解析校验:");

    env::set_var("INTERFACE_TRANSLATOR_BATCH_DELAY_MS", "fast");
    match translation::BatchDelayMs::get() {
        Ok(delay) => println!("   批次间隔: {} ms", delay),
        Err(e) => println!("   批次间隔解析错误: {}", e),
    }

    env::set_var("INTERFACE_TRANSLATOR_API_URL", "not-a-url");
    match translation::ApiUrl::get() {
        Ok(url) => println!("   API地址: {}", url),
        Err(e) => println!("   API地址校验失败: {}", e),
    }

    // 3. 默认值演示
    println!("\n3. 默认值演示:");
    env::remove_var("INTERFACE_TRANSLATOR_LOG_LEVEL");
    println!("   日志级别 (默认): {}", core::LogLevel::get()?);
    env::remove_var("INTERFACE_TRANSLATOR_BATCH_DELAY_MS");
    println!("   批次间隔 (默认): {} ms", translation::BatchDelayMs::get()?);

    // 清理演示用的环境变量
    env::remove_var("INTERFACE_TRANSLATOR_BASE_LANG");
    env::remove_var("INTERFACE_TRANSLATOR_API_URL");

    println!("\n=== 演示完成 ===");
    Ok(())
}
