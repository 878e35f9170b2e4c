/// Interval polling controller.
///
/// An explicit two-state machine (`Idle` ⇄ `Polling`) that owns its worker
/// thread and stop channel. `start` performs one immediate fetch and then
/// one per interval; `stop` cancels future ticks; `refresh` runs one
/// out-of-band fetch without touching the schedule or the state. Dropping
/// the controller stops it, so an owner going away can never leak the
/// timer.
///
/// Overlap policy: **skip**. If a fetch is still running when a tick (or a
/// `refresh`) fires, that trigger is dropped. At most one fetch runs per
/// controller at any time.
///
/// Stopping does not abort a fetch already underway; its result may still
/// land in the cache, but nothing further is scheduled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

type PollTask = Arc<dyn Fn() + Send + Sync + 'static>;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

pub struct Poller {
    interval: Duration,
    task: PollTask,
    /// True while a fetch is executing; enforces the skip policy.
    busy: Arc<AtomicBool>,
    worker: Mutex<Option<Worker>>,
}

impl Poller {
    pub fn new(interval: Duration, task: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            task: Arc::new(task),
            busy: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    pub fn state(&self) -> PollerState {
        if lock(&self.worker).is_some() {
            PollerState::Polling
        } else {
            PollerState::Idle
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Transitions idle → polling: one immediate fetch, then one per
    /// interval. No-op when already polling.
    pub fn start(&self) {
        let mut worker = lock(&self.worker);
        if worker.is_some() {
            tracing::debug!("poller already running; start ignored");
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let task = self.task.clone();
        let busy = self.busy.clone();
        let interval = self.interval;

        let handle = std::thread::spawn(move || {
            run_guarded(&task, &busy);
            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => run_guarded(&task, &busy),
                }
            }
        });

        *worker = Some(Worker { stop_tx, handle });
    }

    /// Transitions polling → idle, cancelling the interval. Safe to call
    /// when already idle. Waits for a fetch currently executing to finish.
    pub fn stop(&self) {
        let worker = lock(&self.worker).take();
        if let Some(Worker { stop_tx, handle }) = worker {
            let _ = stop_tx.send(());
            let _ = handle.join();
        }
    }

    /// One immediate out-of-band fetch on the caller's thread. Does not
    /// alter the interval schedule or the state; skipped if a fetch is
    /// already running.
    pub fn refresh(&self) {
        run_guarded(&self.task, &self.busy);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_guarded(task: &PollTask, busy: &AtomicBool) {
    if busy.swap(true, Ordering::SeqCst) {
        tracing::debug!("previous fetch still running; tick skipped");
        return;
    }
    task();
    busy.store(false, Ordering::SeqCst);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_poller(interval: Duration) -> (Poller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let poller = Poller::new(interval, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (poller, count)
    }

    #[test]
    fn test_new_poller_is_idle() {
        let (poller, count) = counting_poller(Duration::from_secs(10));
        assert_eq!(poller.state(), PollerState::Idle);
        assert_eq!(count.load(Ordering::SeqCst), 0, "no fetch before start");
    }

    #[test]
    fn test_start_performs_immediate_fetch() {
        let (poller, count) = counting_poller(Duration::from_secs(10));
        poller.start();
        assert_eq!(poller.state(), PollerState::Polling);

        // Long interval: the only fetch within the test window is the
        // immediate one.
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        poller.stop();
    }

    #[test]
    fn test_stop_when_idle_is_safe() {
        let (poller, _) = counting_poller(Duration::from_secs(10));
        poller.stop();
        poller.stop();
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[test]
    fn test_refresh_fetches_without_changing_state() {
        let (poller, count) = counting_poller(Duration::from_secs(10));
        poller.refresh();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(poller.state(), PollerState::Idle, "refresh must not start polling");
    }

    #[test]
    fn test_overlapping_trigger_skipped() {
        // A task that holds `busy` long enough for the second trigger.
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let poller = Arc::new(Poller::new(Duration::from_secs(10), move || {
            c.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(200));
        }));

        let p = poller.clone();
        let slow = std::thread::spawn(move || p.refresh());
        std::thread::sleep(Duration::from_millis(50));
        poller.refresh(); // fires while the first is still running
        slow.join().expect("refresh thread should not panic");

        assert_eq!(
            count.load(Ordering::SeqCst),
            1,
            "a trigger arriving mid-fetch must be skipped, not queued"
        );
    }
}
