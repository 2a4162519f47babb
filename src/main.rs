//! 命令行入口
//!
//! 以命令行方式完整走一遍会话流程：加载配置、探测端点、
//! 切换语言并打印按当前语言解析的全部目录文案。

#[cfg(feature = "cli")]
use std::sync::Arc;

#[cfg(feature = "cli")]
use interface_translator::env::{core::LogLevel, EnvVar};
#[cfg(feature = "cli")]
use interface_translator::{Catalog, ConfigManager, DeeplEndpoint, LanguageSession};

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut target_lang: Option<String> = None;
    let mut adhoc_text: Option<String> = None;
    let mut api_url: Option<String> = None;
    let mut show_stats = false;

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--lang" | "-l" => {
                if i + 1 < args.len() {
                    target_lang = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --lang requires a language code");
                    std::process::exit(1);
                }
            }
            "--text" | "-t" => {
                if i + 1 < args.len() {
                    adhoc_text = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --text requires a text argument");
                    std::process::exit(1);
                }
            }
            "--api-url" => {
                if i + 1 < args.len() {
                    api_url = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --api-url requires a URL");
                    std::process::exit(1);
                }
            }
            "--stats" => {
                show_stats = true;
                i += 1;
            }
            "--list-languages" => {
                print_languages();
                return Ok(());
            }
            "--check" => {
                init_logging();
                interface_translator::self_check()?;
                println!("Self check passed");
                return Ok(());
            }
            "--env-help" => {
                println!("{}", interface_translator::env::generate_env_docs());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    init_logging();
    interface_translator::init();

    // 装配会话：配置 → 端点 → 会话
    let manager = ConfigManager::new()?;
    let config = manager.create_config(api_url.as_deref());
    let endpoint = Arc::new(DeeplEndpoint::from_config(&config));
    let session = LanguageSession::new(Catalog::builtin(), endpoint, config)?;

    // 需要远程翻译时先探测端点
    if target_lang.is_some() || adhoc_text.is_some() {
        if !session.probe_endpoint().await {
            eprintln!("Warning: translation endpoint unavailable, staying in base language");
        }
    }

    if let Some(lang) = &target_lang {
        match session.switch_language(lang).await {
            Ok(_) => println!("Active language: {}\n", session.active_language()),
            Err(e) => eprintln!("Warning: {}\n", e),
        }
    }

    // 按当前语言打印全部目录文案
    for entry in session.catalog().iter() {
        println!("{} = {}", entry.key, session.lookup(&entry.key));
    }

    if let Some(text) = &adhoc_text {
        let translated = session.translate_text(text).await;
        println!("\n> {}", translated);
    }

    if show_stats {
        let fetcher = session.fetcher_stats();
        let cache = session.cache_stats();
        println!("\nRequests: {} (fallbacks: {})", fetcher.requests, fetcher.fallbacks);
        println!(
            "Cache: {} languages, hit rate {:.1}%",
            session.cached_languages().len(),
            cache.hit_rate * 100.0
        );
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_logging() {
    let level = match LogLevel::get().unwrap_or_else(|_| "info".to_string()).as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(level).init();
}

#[cfg(feature = "cli")]
fn print_languages() {
    println!("Supported languages:");
    for lang in interface_translator::SUPPORTED_LANGUAGES {
        println!("    {} {}  {}", lang.flag, lang.code, lang.name);
    }
}

#[cfg(feature = "cli")]
fn print_help() {
    println!("Interface Translator");
    println!();
    println!("USAGE:");
    println!("    interface-translator [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -l, --lang <CODE>        Switch the interface to this language");
    println!("    -t, --text <TEXT>        Translate an ad-hoc text in the active language");
    println!("        --api-url <URL>      Override the translation API endpoint");
    println!("        --stats              Print request and cache statistics");
    println!("        --list-languages     List supported languages");
    println!("        --check              Run library self check");
    println!("        --env-help           Print environment variable documentation");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    interface-translator --list-languages");
    println!("    interface-translator --lang es");
    println!("    interface-translator --lang fr --text \"See you tomorrow\" --stats");
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("Error: CLI feature not enabled. Please compile with --features cli");
    std::process::exit(1);
}
