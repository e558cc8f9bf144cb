//! End-to-end console flows: login, polling, logout, error resolution.

mod support;

use std::time::Duration;

use helmsman::application::Admission;
use helmsman::domain::{CommandKind, Severity};
use helmsman::error::{AuthError, Error};
use helmsman::port::{ConsoleEvent, Feed};
use helmsman::testkit::{fixtures, Endpoint, FakeBotApi, MemoryTokenStore};
use support::{settle, Rig};

fn counts(rig: &Rig) -> [u32; 4] {
    [
        rig.api.calls_to(Endpoint::Status),
        rig.api.calls_to(Endpoint::Trades),
        rig.api.calls_to(Endpoint::News),
        rig.api.calls_to(Endpoint::Errors),
    ]
}

#[tokio::test(start_paused = true)]
async fn login_loads_each_feed_once_then_polls() {
    let rig = Rig::new();

    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();
    settle().await;

    assert_eq!(counts(&rig), [1, 1, 1, 1]);
    assert!(rig.console.store().snapshot().is_some());
    assert!(rig.console.is_polling());
    assert_eq!(rig.tokens.stored().as_deref(), Some(FakeBotApi::TOKEN));

    // Nothing fires before the first full period.
    tokio::time::sleep(Duration::from_secs(4)).await;
    settle().await;
    assert_eq!(counts(&rig), [1, 1, 1, 1]);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    settle().await;
    assert_eq!(counts(&rig), [2, 2, 1, 2]);

    tokio::time::sleep(Duration::from_secs(55)).await;
    settle().await;
    assert_eq!(rig.api.calls_to(Endpoint::News), 2);
    assert_eq!(rig.api.calls_to(Endpoint::Status), 13);
}

#[tokio::test]
async fn wrong_password_leaves_everything_idle() {
    let rig = Rig::new();

    let result = rig.console.login("hunter2").await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    assert!(!rig.console.is_authenticated());
    assert!(!rig.console.is_polling());
    assert_eq!(counts(&rig), [0, 0, 0, 0]);
    assert_eq!(rig.tokens.stored(), None);
}

#[tokio::test(start_paused = true)]
async fn persisted_token_resumes_supervision() {
    let rig = Rig::logged_in();

    assert!(rig.console.resume().await);

    assert!(rig.console.is_authenticated());
    assert!(rig.console.session().current().unwrap().is_restored());
    assert_eq!(counts(&rig), [1, 1, 1, 1]);
    assert!(rig.console.is_polling());
}

#[tokio::test]
async fn nothing_to_resume_without_a_token() {
    let rig = Rig::new();

    assert!(!rig.console.resume().await);
    assert_eq!(counts(&rig), [0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn logout_stops_polling_and_clears_state() {
    let rig = Rig::new();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();

    assert!(rig.console.logout().await);
    settle().await;

    assert!(!rig.console.is_authenticated());
    assert!(!rig.console.is_polling());
    assert!(rig.console.store().snapshot().is_none());
    assert_eq!(rig.tokens.stored(), None);
    assert!(rig.notifier.contains(&ConsoleEvent::SessionEnded));

    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(counts(&rig), [1, 1, 1, 1]);
}

#[tokio::test(start_paused = true)]
async fn unreachable_logout_still_clears_the_session() {
    let rig = Rig::new();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();
    rig.api.set_delay(Endpoint::Logout, Duration::from_secs(30));

    assert!(!rig.console.logout().await);

    assert!(!rig.console.is_authenticated());
    assert_eq!(rig.tokens.stored(), None);
}

#[tokio::test(start_paused = true)]
async fn response_landing_after_logout_is_discarded() {
    let rig = Rig::new();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();
    rig.api
        .push_status(fixtures::snapshot(true), Duration::from_secs(3));

    let sync = rig.console.sync().clone();
    let pending = tokio::spawn(async move { sync.refresh_status().await });
    settle().await;
    rig.console.logout().await;

    let admission = pending.await.unwrap().unwrap();
    assert!(matches!(admission, Admission::Cancelled { .. }));
    assert!(rig.console.store().snapshot().is_none());
}

#[tokio::test(start_paused = true)]
async fn rejected_token_halts_polling() {
    let rig = Rig::with_tokens(MemoryTokenStore::with_token("expired-token"));
    rig.console.resume().await;
    assert!(rig.console.is_polling());

    assert!(rig.console.commands().stop().await.is_err());
    settle().await;

    assert!(!rig.console.is_authenticated());
    assert!(!rig.console.is_polling());

    let status_calls = rig.api.calls_to(Endpoint::Status);
    tokio::time::sleep(Duration::from_secs(20)).await;
    settle().await;
    assert_eq!(rig.api.calls_to(Endpoint::Status), status_calls);
}

#[tokio::test(start_paused = true)]
async fn poll_failures_are_informational() {
    let rig = Rig::new();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();
    rig.api
        .fail_next(Endpoint::Status, Error::Connection("connection refused".into()));

    tokio::time::sleep(Duration::from_millis(5500)).await;
    settle().await;

    assert!(rig.notifier.events().iter().any(|e| matches!(
        e,
        ConsoleEvent::RefreshFailed {
            feed: Feed::Status,
            ..
        }
    )));
    assert!(rig.console.banner().is_none());
    assert!(rig.console.store().snapshot().is_some());
    assert!(rig.console.is_polling());
}

#[tokio::test]
async fn resolving_an_error_is_confirmed_by_refetch() {
    let rig = Rig::new();
    rig.api.set_errors(vec![
        fixtures::system_error_at("err-1", Severity::Critical, 60),
        fixtures::system_error_at("err-2", Severity::Low, 5),
    ]);
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();
    assert_eq!(rig.console.error_log().unresolved().len(), 2);

    let outcome = rig.console.error_log().resolve("err-1").await.unwrap();

    assert!(outcome.confirmed);
    assert!(rig.console.error_log().is_resolved("err-1"));
    assert_eq!(rig.console.error_log().unresolved().len(), 1);
    assert_eq!(rig.api.calls_to(Endpoint::ResolveError), 1);
    assert_eq!(rig.api.calls_to(Endpoint::Errors), 2);
}

#[tokio::test]
async fn unconfirmed_resolve_raises_a_banner() {
    let rig = Rig::new();
    rig.api
        .set_errors(vec![fixtures::system_error("err-1", Severity::High)]);
    rig.api.ignore_resolves();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();

    let outcome = rig.console.error_log().resolve("err-1").await.unwrap();

    assert!(!outcome.confirmed);
    assert!(!rig.console.error_log().is_resolved("err-1"));
    assert_eq!(
        rig.console.banner(),
        Some(ConsoleEvent::ResolveUnconfirmed {
            id: "err-1".to_string()
        })
    );
}

#[tokio::test]
async fn resolving_an_unknown_error_fails_loudly() {
    let rig = Rig::new();
    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();

    assert!(rig.console.error_log().resolve("missing").await.is_err());

    assert!(matches!(
        rig.console.banner(),
        Some(ConsoleEvent::CommandFailed {
            kind: CommandKind::ResolveError,
            ..
        })
    ));
}

#[tokio::test]
async fn news_is_fetched_with_the_configured_limit() {
    let rig = Rig::new();
    rig.api.set_news(
        (0..20)
            .map(|i| fixtures::news_item(&format!("headline {i}"), i * 60))
            .collect(),
    );

    rig.console.login(FakeBotApi::PASSWORD).await.unwrap();

    assert_eq!(rig.api.last_news_limit(), Some(10));
    let news = rig.console.store().news();
    assert_eq!(news.len(), 10);
    assert_eq!(news[0].title, "headline 0");
}

#[tokio::test(start_paused = true)]
async fn command_finishing_after_logout_leaves_state_empty() {
    let rig = Rig::logged_in();
    assert!(rig.console.attach().await);
    rig.api.set_delay(Endpoint::Start, Duration::from_secs(3));

    let (started, ()) = tokio::join!(rig.console.commands().start(&[]), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        rig.console.logout().await;
        assert!(rig.console.store().snapshot().is_none());
    });

    assert!(started.is_ok());
    assert!(!rig.console.is_authenticated());
    assert!(rig.console.store().snapshot().is_none());
    assert_eq!(rig.api.calls_to(Endpoint::Status), 1);
    assert!(rig.console.banner().is_none());
}

#[tokio::test(start_paused = true)]
async fn rejected_token_clears_the_console() {
    let rig = Rig::with_tokens(MemoryTokenStore::with_token("expired-token"));
    rig.api
        .set_errors(vec![fixtures::system_error("err-1", Severity::High)]);
    rig.console.resume().await;
    assert!(rig.console.store().snapshot().is_some());
    assert_eq!(rig.console.error_log().entries().len(), 1);

    assert!(rig.console.commands().stop().await.is_err());

    assert!(rig.console.store().snapshot().is_none());
    assert!(rig.console.error_log().entries().is_empty());
    assert!(rig.notifier.contains(&ConsoleEvent::SessionEnded));
    assert!(matches!(
        rig.console.banner(),
        Some(ConsoleEvent::CommandFailed {
            kind: CommandKind::Stop,
            ..
        })
    ));
}
