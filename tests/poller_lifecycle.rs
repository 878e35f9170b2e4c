/// Integration tests for poller lifecycle behavior:
/// 1. Start/stop state transitions and their fetch side effects
/// 2. Interval ticking
/// 3. Cancellation on stop and on drop
///
/// Long (10 s) intervals make "exactly the immediate fetch" countable
/// inside a short test window; the ticking test uses a short interval.
///
/// Run with: cargo test --test poller_lifecycle

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ipalmon_client::poller::{Poller, PollerState};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn counting_poller(interval: Duration) -> (Poller, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let poller = Poller::new(interval, move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (poller, count)
}

// ---------------------------------------------------------------------------
// 1. State Transitions
// ---------------------------------------------------------------------------

#[test]
fn test_double_start_performs_one_immediate_fetch() {
    let (poller, count) = counting_poller(Duration::from_secs(10));
    poller.start();
    poller.start(); // second start is a no-op, not a second schedule

    thread::sleep(Duration::from_millis(100));
    assert_eq!(poller.state(), PollerState::Polling);
    assert_eq!(
        count.load(Ordering::SeqCst),
        1,
        "starting twice must not double the immediate fetch"
    );
    poller.stop();
}

#[test]
fn test_stop_then_start_resumes_polling() {
    let (poller, count) = counting_poller(Duration::from_secs(10));
    poller.start();
    thread::sleep(Duration::from_millis(50));
    poller.stop();
    assert_eq!(poller.state(), PollerState::Idle);

    poller.start();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(poller.state(), PollerState::Polling);
    assert_eq!(
        count.load(Ordering::SeqCst),
        2,
        "each start performs its own immediate fetch"
    );
    poller.stop();
}

#[test]
fn test_no_fetches_after_stop_until_restarted_or_refreshed() {
    let (poller, count) = counting_poller(Duration::from_millis(50));
    poller.start();
    thread::sleep(Duration::from_millis(120));
    poller.stop();

    let after_stop = count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(200));
    assert_eq!(
        count.load(Ordering::SeqCst),
        after_stop,
        "a stopped poller must not fetch on its own"
    );

    poller.refresh();
    assert_eq!(
        count.load(Ordering::SeqCst),
        after_stop + 1,
        "refresh still works while stopped"
    );
    assert_eq!(poller.state(), PollerState::Idle);
}

// ---------------------------------------------------------------------------
// 2. Interval Ticking
// ---------------------------------------------------------------------------

#[test]
fn test_interval_produces_repeated_fetches() {
    let (poller, count) = counting_poller(Duration::from_millis(30));
    poller.start();

    // Immediate fetch plus several ticks. Exact counts depend on scheduler
    // timing, so only assert a lower bound.
    thread::sleep(Duration::from_millis(200));
    poller.stop();
    assert!(
        count.load(Ordering::SeqCst) >= 3,
        "expected the immediate fetch plus interval ticks, got {}",
        count.load(Ordering::SeqCst)
    );
}

// ---------------------------------------------------------------------------
// 3. Cancellation
// ---------------------------------------------------------------------------

#[test]
fn test_drop_cancels_the_schedule() {
    let count = Arc::new(AtomicUsize::new(0));
    {
        let c = count.clone();
        let poller = Poller::new(Duration::from_millis(30), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        poller.start();
        thread::sleep(Duration::from_millis(100));
        // poller dropped here
    }

    let after_drop = count.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(150));
    assert_eq!(
        count.load(Ordering::SeqCst),
        after_drop,
        "dropping the poller must cancel its timer"
    );
}

#[test]
fn test_stop_waits_for_running_fetch() {
    // The fetch sleeps; stop() must join the worker, so by the time it
    // returns the in-progress fetch has completed.
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let poller = Poller::new(Duration::from_secs(10), move || {
        thread::sleep(Duration::from_millis(150));
        c.fetch_add(1, Ordering::SeqCst);
    });

    poller.start();
    thread::sleep(Duration::from_millis(20)); // let the immediate fetch begin
    poller.stop();
    assert_eq!(
        count.load(Ordering::SeqCst),
        1,
        "stop must not abandon a fetch already underway"
    );
}
