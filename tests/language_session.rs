//! 语言会话集成测试
//!
//! 覆盖语言切换状态机的完整流程：可用性门控、缓存复用、
//! 切换过程中的查找语义以及并发切换的串行化。

use std::sync::Arc;
use std::time::Duration;

use interface_translator::{SwitchOutcome, TranslationError};

mod common {
    include!("common/mod.rs");
}

use common::{test_session, MockEndpoint, PerformanceHelper};

/// 测试首次切换触发探测并翻译整个目录
#[tokio::test]
async fn test_switch_translates_whole_catalog() {
    let endpoint = Arc::new(MockEndpoint::new().with_reply("Hello", "Hola"));
    let session = test_session(endpoint.clone());

    let outcome = session
        .switch_language("es")
        .await
        .expect("switch should succeed");
    assert_eq!(
        outcome,
        SwitchOutcome::Switched {
            newly_translated: true
        }
    );

    // 一次探测 + 目录每条文案一次调用
    assert_eq!(endpoint.calls(), 1 + session.catalog().len());
    assert_eq!(session.active_language(), "es");
    assert!(!session.is_translating());

    // 固定回复生效，其余文案使用默认改写
    assert_eq!(session.lookup("greeting"), "Hola");
    assert_eq!(session.lookup("settings"), "es:Settings");

    println!(
        "✅ 首次切换测试通过 - {} 条文案, {} 次端点调用",
        session.catalog().len(),
        endpoint.calls()
    );
}

/// 测试往返切换复用缓存，不再发起远程调用
#[tokio::test]
async fn test_repeated_switch_reuses_cache() {
    let endpoint = Arc::new(MockEndpoint::new());
    let session = test_session(endpoint.clone());

    session
        .switch_language("es")
        .await
        .expect("first switch should succeed");
    let calls_after_first = endpoint.calls();

    // 回到基准语言不需要端点
    let back = session
        .switch_language("en")
        .await
        .expect("switch back to base should succeed");
    assert_eq!(
        back,
        SwitchOutcome::Switched {
            newly_translated: false
        }
    );
    assert_eq!(endpoint.calls(), calls_after_first);
    assert!(!session.is_translating());
    assert_eq!(session.lookup("greeting"), "Hello");

    // 再次切换命中缓存
    let again = session
        .switch_language("es")
        .await
        .expect("cached switch should succeed");
    assert_eq!(
        again,
        SwitchOutcome::Switched {
            newly_translated: false
        }
    );
    assert_eq!(
        endpoint.calls(),
        calls_after_first,
        "cached switch must not call the endpoint"
    );
    assert_eq!(session.lookup("greeting"), "es:Hello");
    assert_eq!(session.cached_languages(), vec!["es".to_string()]);
}

/// 测试目标语言已经生效时切换是无操作
#[tokio::test]
async fn test_switch_to_active_language_is_noop() {
    let endpoint = Arc::new(MockEndpoint::new());
    let session = test_session(endpoint.clone());

    session
        .switch_language("es")
        .await
        .expect("switch should succeed");
    let calls = endpoint.calls();

    let outcome = session
        .switch_language("es")
        .await
        .expect("repeated switch should succeed");
    assert_eq!(outcome, SwitchOutcome::AlreadyActive);
    assert_eq!(endpoint.calls(), calls);
    assert_eq!(session.stats().switches_completed, 1);
}

/// 测试探测失败时切换被拒绝，界面保持当前语言
#[tokio::test]
async fn test_unavailable_endpoint_blocks_switch() {
    let endpoint = Arc::new(MockEndpoint::unavailable());
    let session = test_session(endpoint.clone());

    let result = session.switch_language("es").await;
    let err = result.expect_err("switch should fail when the endpoint is down");
    assert!(matches!(err, TranslationError::EndpointUnavailable));
    assert!(err.is_user_visible(), "gate error must be presentable");
    assert!(!err.to_string().is_empty());

    // 只有探测调用，目录从未被发送
    assert_eq!(endpoint.calls(), 1);
    assert_eq!(session.fetcher_stats().requests, 0);
    assert_eq!(session.active_language(), "en");
    assert!(!session.is_translating());
    assert_eq!(session.lookup("greeting"), "Hello");
    assert_eq!(session.endpoint_available(), Some(false));
    assert_eq!(session.stats().switches_rejected, 1);

    // 探测结论被记忆，后续切换不再触碰端点
    assert!(session.switch_language("fr").await.is_err());
    assert_eq!(endpoint.calls(), 1);
}

/// 测试服务恢复后通过显式重新探测解除门控
#[tokio::test]
async fn test_recheck_allows_recovery() {
    let endpoint = Arc::new(MockEndpoint::unavailable());
    let session = test_session(endpoint.clone());

    assert!(session.switch_language("es").await.is_err());

    // 服务恢复，用户要求重新检测
    endpoint.set_available(true);
    assert!(session.recheck_endpoint().await);
    assert_eq!(session.endpoint_available(), Some(true));

    let outcome = session
        .switch_language("es")
        .await
        .expect("switch after recovery should succeed");
    assert_eq!(
        outcome,
        SwitchOutcome::Switched {
            newly_translated: true
        }
    );
    assert_eq!(session.lookup("greeting"), "es:Hello");
}

/// 测试切换进行中时查找仍按旧语言解析
#[tokio::test]
async fn test_lookup_during_switch_uses_previous_language() {
    let endpoint = Arc::new(MockEndpoint::new().with_latency(Duration::from_millis(20)));
    let session = Arc::new(test_session(endpoint.clone()));

    let handle = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.switch_language("es").await })
    };

    // 等切换进入进行中状态
    let mut saw_translating = false;
    for _ in 0..50 {
        if session.is_translating() {
            saw_translating = true;
            // 进行中的查找解析为切换前的语言
            assert_eq!(session.active_language(), "en");
            assert_eq!(session.lookup("greeting"), "Hello");
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    handle
        .await
        .expect("switch task should not panic")
        .expect("switch should succeed");
    assert!(
        saw_translating,
        "switch should pass through the translating state"
    );
    assert_eq!(session.lookup("greeting"), "es:Hello");
}

/// 测试并发切换排队串行执行
#[tokio::test]
async fn test_concurrent_switches_serialize() {
    let latency = Duration::from_millis(10);
    let endpoint = Arc::new(MockEndpoint::new().with_latency(latency));
    let session = Arc::new(test_session(endpoint.clone()));
    let catalog_len = session.catalog().len();

    let ((first, second), elapsed) = PerformanceHelper::measure_async_time(|| async {
        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.switch_language("es").await })
        };
        let second = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.switch_language("fr").await })
        };
        (
            first.await.expect("first switch task should not panic"),
            second.await.expect("second switch task should not panic"),
        )
    })
    .await;

    assert!(first.is_ok(), "first switch should succeed: {:?}", first);
    assert!(second.is_ok(), "second switch should succeed: {:?}", second);

    // 两个目标语言都有完整缓存，最终停在其中一个
    assert_eq!(
        session.cached_languages(),
        vec!["es".to_string(), "fr".to_string()]
    );
    let active = session.active_language();
    assert!(active == "es" || active == "fr");
    assert!(!session.is_translating());

    // 调用日志按批次连续出现，说明两次切换没有交错
    let log = endpoint.call_log();
    assert_eq!(log.len(), 1 + catalog_len * 2);
    for batch in log[1..].chunks(catalog_len) {
        let prefix = batch[0]
            .split(':')
            .next()
            .expect("log entries carry a target prefix");
        assert!(
            batch.iter().all(|entry| entry.starts_with(prefix)),
            "batches from different switches must not interleave: {:?}",
            log
        );
    }

    // 串行执行的耗时下限：两个完整批次
    assert!(
        elapsed >= latency * (catalog_len as u32 * 2),
        "switches should run serially, got {:?}",
        elapsed
    );

    println!("✅ 并发切换串行化测试通过 - 总耗时 {:?}", elapsed);
}

/// 测试并发的首次探测合并为一次远程调用
#[tokio::test]
async fn test_concurrent_probes_coalesce() {
    let endpoint = Arc::new(MockEndpoint::new().with_latency(Duration::from_millis(10)));
    let session = Arc::new(test_session(endpoint.clone()));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.probe_endpoint().await })
    };
    let second = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.probe_endpoint().await })
    };

    assert!(first.await.expect("probe task should not panic"));
    assert!(second.await.expect("probe task should not panic"));
    assert_eq!(
        endpoint.calls(),
        1,
        "concurrent probes must share one request"
    );
}

/// 测试会话统计区分完成、拒绝与无操作
#[tokio::test]
async fn test_switch_stats() {
    let endpoint = Arc::new(MockEndpoint::new());
    let session = test_session(endpoint.clone());

    session
        .switch_language("es")
        .await
        .expect("switch should succeed");
    assert!(session.switch_language("xx").await.is_err());
    // 重复切换到当前语言不计入任何统计
    session
        .switch_language("es")
        .await
        .expect("noop switch should succeed");

    let stats = session.stats();
    assert_eq!(stats.switches_completed, 1);
    assert_eq!(stats.switches_rejected, 1);
    assert_eq!(stats.switches_failed, 0);
    assert!(stats.processing_time_micros > 0);
}
