//! Sequence admission under out-of-order responses.

mod support;

use std::time::Duration;

use helmsman::application::Admission;
use helmsman::error::Error;
use helmsman::testkit::{fixtures, Endpoint};
use support::{settle, Rig};

#[tokio::test(start_paused = true)]
async fn later_request_wins_even_when_earlier_response_lands_last() {
    let rig = Rig::new();
    let sync = rig.console.sync().clone();

    // A: issued at t=0, answers "stopped" at t=15.
    rig.api
        .push_status(fixtures::snapshot(false), Duration::from_secs(15));
    // B: issued at t=10, answers "running" at t=12.
    rig.api
        .push_status(fixtures::snapshot(true), Duration::from_secs(2));

    let first = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh_status().await })
    };
    settle().await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    let second = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.refresh_status().await })
    };

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(rig.console.store().is_running());

    let second = second.await.unwrap().unwrap();
    let first = first.await.unwrap().unwrap();
    assert_eq!(second, Admission::Applied);
    assert!(matches!(first, Admission::Stale { .. }));
    assert!(rig.console.store().is_running());
}

#[tokio::test(start_paused = true)]
async fn response_after_teardown_is_dropped() {
    let rig = Rig::new();
    let sync = rig.console.sync().clone();
    rig.api
        .push_status(fixtures::snapshot(true), Duration::from_secs(5));

    let pending = tokio::spawn(async move { sync.refresh_status().await });
    settle().await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    rig.console.teardown();

    let admission = pending.await.unwrap().unwrap();
    assert!(matches!(admission, Admission::Cancelled { .. }));
    assert!(rig.console.store().snapshot().is_none());
}

#[tokio::test]
async fn failed_fetch_keeps_last_known_good() {
    let rig = Rig::new();
    rig.api.set_trades(vec![fixtures::trade_at("dogecoin", 30)]);
    rig.console.sync().refresh_trades().await.unwrap();

    rig.api
        .fail_next(Endpoint::Trades, Error::Connection("reset by peer".into()));
    assert!(rig.console.sync().refresh_trades().await.is_err());
    assert_eq!(rig.console.store().trades().len(), 1);
}

#[tokio::test]
async fn trades_are_kept_newest_first() {
    let rig = Rig::new();
    rig.api.set_trades(vec![
        fixtures::trade_at("dogecoin", 300),
        fixtures::trade_at("cardano", 10),
        fixtures::trade_at("stellar", 60),
    ]);
    rig.console.sync().refresh_trades().await.unwrap();

    let symbols: Vec<String> = rig
        .console
        .store()
        .trades()
        .into_iter()
        .map(|t| t.symbol)
        .collect();
    assert_eq!(symbols, ["cardano", "stellar", "dogecoin"]);
}
