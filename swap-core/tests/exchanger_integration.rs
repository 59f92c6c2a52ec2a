//! Integration tests for the assembled exchanger.
//!
//! These tests drive real provider implementations against a scripted
//! transport, covering the full builder → chain → cache path.

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;
use swap_core::SwapBuilder;
use swap_services::testing::MockTransport;
use swap_types::{FailureKind, ProviderOptions, ResolveError, TransportError};

fn options(value: serde_json::Value) -> ProviderOptions {
    value.as_object().cloned().unwrap()
}

fn fixer_options() -> ProviderOptions {
    options(json!({"access_key": "secret", "base_url": "http://fixer.test/api"}))
}

fn frankfurter_options() -> ProviderOptions {
    options(json!({"base_url": "http://frankfurter.test"}))
}

#[tokio::test]
async fn test_fixer_unavailable_falls_back_to_frankfurter() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(
                200,
                r#"{"success":false,"error":{"code":202,"info":"invalid symbols"}}"#,
            )
            .respond(200, r#"{"base":"EUR","rates":{"USD":1.0956}}"#),
    );
    let exchanger = SwapBuilder::new()
        .use_transport(transport.clone())
        .add_provider("fixer", fixer_options())
        .add_provider("frankfurter", frankfurter_options())
        .build()
        .unwrap();

    let rate = exchanger.latest("EUR/USD").await.unwrap();

    assert_eq!(rate.value(), dec!(1.0956));
    assert_eq!(rate.provider(), "frankfurter");

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "http://fixer.test/api/latest?access_key=secret&symbols=USD".to_string(),
            "http://frankfurter.test/latest?from=EUR&to=USD".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_cached_rate_skips_transport() {
    let transport =
        Arc::new(MockTransport::new().respond(200, r#"{"base":"EUR","rates":{"USD":1.0956}}"#));
    let exchanger = SwapBuilder::new()
        .use_transport(transport.clone())
        .add_provider("frankfurter", frankfurter_options())
        .build()
        .unwrap();

    let first = exchanger.latest("EUR/USD").await.unwrap();
    let second = exchanger.latest("EUR/USD").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_unsupported_base_never_hits_network() {
    let transport = Arc::new(
        MockTransport::new().respond(200, r#"{"base":"USD","rates":{"EUR":0.9127}}"#),
    );
    let exchanger = SwapBuilder::new()
        .use_transport(transport.clone())
        .add_provider("fixer", fixer_options())
        .add_provider("frankfurter", frankfurter_options())
        .build()
        .unwrap();

    let rate = exchanger.latest("USD/EUR").await.unwrap();

    assert_eq!(rate.provider(), "frankfurter");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_stop_on_transport_error() {
    let transport = Arc::new(
        MockTransport::new()
            .fail(TransportError::Timeout("fixer.test".into()))
            .respond(200, r#"{"base":"EUR","rates":{"USD":1.0956}}"#),
    );
    let exchanger = SwapBuilder::new()
        .use_transport(transport.clone())
        .stop_on_transport_error(true)
        .add_provider("fixer", fixer_options())
        .add_provider("frankfurter", frankfurter_options())
        .build()
        .unwrap();

    let err = exchanger.latest("EUR/USD").await.unwrap_err();

    match err {
        ResolveError::ChainExhausted { failures, .. } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].provider, "fixer");
            assert_eq!(failures[0].kind, FailureKind::Transport);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_concurrent_callers_share_exchanger() {
    let transport = Arc::new(MockTransport::new());
    let exchanger = Arc::new(
        SwapBuilder::new()
            .use_transport(transport)
            .add_provider(
                "static",
                options(json!({"latest": {"EUR/USD": 1.1, "GBP/USD": 1.27}})),
            )
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let exchanger = exchanger.clone();
            tokio::spawn(async move {
                let pair = if i % 2 == 0 { "EUR/USD" } else { "GBP/USD" };
                exchanger.latest(pair).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let rate = handle.await.unwrap().unwrap();
        let expected = if i % 2 == 0 { dec!(1.1) } else { dec!(1.27) };
        assert_eq!(rate.value(), expected);
    }
}
