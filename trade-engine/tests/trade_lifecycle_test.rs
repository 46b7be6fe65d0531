//! End-to-end exercise of the order lifecycle against the in-memory store
//! and transports: list quotes, trade both legs, drain the broker queue,
//! sweep completions, and read the market summary.

use std::sync::Arc;

use broker_api::{OrderStatus, TradeStore};
use broker_core::outbound::{memory_queue, memory_topic};
use broker_core::MemoryStore;
use trade_engine::{CompletionMode, Engine, TradeSettings};

struct Harness {
    engine: Engine,
    store: Arc<MemoryStore>,
    queue_rx: broker_core::comms::ReceiverSocket<broker_api::OrderMessage>,
    _quote_rx: broker_core::comms::ReceiverSocket<broker_api::QuotePriceChange>,
    _event_rx: broker_core::comms::ReceiverSocket<broker_api::MarketEvent>,
}

fn build_engine(settings: TradeSettings) -> Harness {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = Arc::new(MemoryStore::new());
    let (queue, queue_rx) = memory_queue(64);
    let (topic, quote_rx, event_rx) = memory_topic(64);
    let engine = Engine::new(store.clone(), Arc::new(queue), Arc::new(topic), settings);
    Harness {
        engine,
        store,
        queue_rx,
        _quote_rx: quote_rx,
        _event_rx: event_rx,
    }
}

#[tokio::test]
async fn test_full_trading_day() {
    let settings = TradeSettings::default()
        .with_update_quote_prices(false)
        .with_market_summary_interval(0);
    let mut harness = build_engine(settings);
    let engine = harness.engine.clone();
    let store = harness.store.clone();

    // Open the shop: two symbols, one customer.
    store.insert_account("uid:0", 50_000.0, 0).unwrap();
    engine.create_quote("s:0", "S0 Incorporated", 120.0).unwrap();
    engine.create_quote("s:1", "S1 Incorporated", 80.0).unwrap();

    let account = engine.login("uid:0").unwrap();
    assert_eq!(account.login_count(), 1);

    // Synchronous buy settles inline.
    let buy = engine
        .buy("uid:0", "s:0", 100.0, CompletionMode::Synchronous)
        .await
        .unwrap();
    assert_eq!(buy.status(), OrderStatus::Closed);

    let expected_after_buy = 50_000.0 - (100.0 * 120.0 + 24.95);
    assert!((engine.account("uid:0").unwrap().balance() - expected_after_buy).abs() < 1e-6);

    // Queued sell parks the order until the consumer drains the command.
    let holding_id = engine.holdings("uid:0").unwrap()[0].holding_id();
    let sell = engine
        .sell("uid:0", holding_id, CompletionMode::Queued)
        .await
        .unwrap();
    assert_eq!(sell.status(), OrderStatus::Open);

    let command = harness.queue_rx.recv().await.unwrap();
    assert_eq!(command.command(), "neworder");
    let settled = engine
        .complete_order(command.order_id(), command.two_phase())
        .await
        .unwrap();
    assert_eq!(settled.status(), OrderStatus::Closed);
    assert!(engine.holdings("uid:0").unwrap().is_empty());

    let expected_final = expected_after_buy + (100.0 * 120.0 - 24.95);
    assert!((engine.account("uid:0").unwrap().balance() - expected_final).abs() < 1e-6);

    // Both orders show up in the one-shot completion sweep.
    let swept = engine.closed_orders("uid:0").unwrap();
    assert_eq!(swept.len(), 2);
    assert!(engine.closed_orders("uid:0").unwrap().is_empty());

    // The summary sees the whole universe.
    let summary = engine.market_summary().await.unwrap();
    assert!((summary.index_value() - 100.0).abs() < 1e-9);
    assert!((summary.open_index_value() - 100.0).abs() < 1e-9);
    assert_eq!(summary.top_gainers().len(), 2);

    engine.logout("uid:0").unwrap();
    assert_eq!(engine.account("uid:0").unwrap().logout_count(), 1);
}

#[tokio::test]
async fn test_concurrent_buyers_share_one_engine() {
    let settings = TradeSettings::default().with_update_quote_prices(false);
    let harness = build_engine(settings);
    let engine = harness.engine.clone();
    let store = harness.store.clone();

    engine.create_quote("s:0", "S0 Incorporated", 10.0).unwrap();
    for i in 0..8 {
        store
            .insert_account(&format!("uid:{}", i), 10_000.0, 0)
            .unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .buy(&format!("uid:{}", i), "s:0", 5.0, CompletionMode::Synchronous)
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        let order = handle.await.unwrap();
        assert_eq!(order.status(), OrderStatus::Closed);
    }

    // One holding per buyer, each debited identically.
    for i in 0..8 {
        let user = format!("uid:{}", i);
        assert_eq!(engine.holdings(&user).unwrap().len(), 1);
        let balance = engine.account(&user).unwrap().balance();
        assert!((balance - (10_000.0 - (5.0 * 10.0 + 24.95))).abs() < 1e-6);
    }
}
