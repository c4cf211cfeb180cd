//! Integration tests for the one-shot expiry timer.
//!
//! All tests run with Tokio's clock paused: sleeping auto-advances time, so
//! the timer's deadline is reached instantly and exactly.

use chrono::Duration;
use tokio::time::Instant;

use softplan_core::expiry::ExpiryTimer;
use softplan_test_utils::fixed_now;

#[tokio::test(start_paused = true)]
async fn fires_once_at_the_expiry_instant() {
    let now = fixed_now();
    let started = Instant::now();
    let timer = ExpiryTimer::start(now + Duration::minutes(90), now);
    let mut rx = timer.subscribe();
    assert!(!timer.is_expired());

    assert!(timer.expired().await);
    let elapsed = started.elapsed();
    assert!(elapsed >= std::time::Duration::from_secs(90 * 60));
    assert!(elapsed < std::time::Duration::from_secs(90 * 60 + 1));
    assert!(timer.is_expired());

    // The single transition was observed; the sender is gone afterwards.
    assert!(rx.changed().await.is_ok());
    assert!(*rx.borrow());
    assert!(rx.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn past_instant_is_expired_immediately() {
    let now = fixed_now();
    let timer = ExpiryTimer::start(now - Duration::seconds(1), now);
    assert!(timer.is_expired());
    assert!(timer.expired().await);

    let at_now = ExpiryTimer::start(now, now);
    assert!(at_now.is_expired());
}

#[tokio::test(start_paused = true)]
async fn cancelled_timer_never_fires() {
    let now = fixed_now();
    let timer = ExpiryTimer::start(now + Duration::minutes(5), now);
    let mut rx = timer.subscribe();

    timer.cancel();
    assert!(!timer.expired().await);
    assert!(rx.changed().await.is_err());
    assert!(!*rx.borrow());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_timer_cancels_it() {
    let now = fixed_now();
    let timer = ExpiryTimer::start(now + Duration::minutes(5), now);
    let mut rx = timer.subscribe();

    drop(timer);
    assert!(rx.changed().await.is_err());
    assert!(!*rx.borrow());
}

#[tokio::test(start_paused = true)]
async fn reschedule_replaces_the_deadline() {
    let now = fixed_now();
    let started = Instant::now();
    let mut timer = ExpiryTimer::start(now + Duration::minutes(5), now);
    let mut old = timer.subscribe();

    timer.reschedule(now + Duration::minutes(30), now);
    assert_eq!(timer.expires_at(), now + Duration::minutes(30));

    // The first deadline no longer fires.
    assert!(old.changed().await.is_err());
    assert!(!*old.borrow());

    assert!(timer.expired().await);
    let elapsed = started.elapsed();
    assert!(elapsed >= std::time::Duration::from_secs(30 * 60));
    assert!(elapsed < std::time::Duration::from_secs(31 * 60));
}
