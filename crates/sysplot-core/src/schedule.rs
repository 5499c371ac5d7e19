//! Fixed-cadence tick scheduler.
//!
//! The interval between ticks is measured from the *end* of the previous
//! tick, not from the previous deadline: tick duration adds to the effective
//! cadence, and a slow tick shifts all later ones instead of being caught
//! up. Missed cadence is never queued.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct Shared {
    stopped: Mutex<bool>,
    wake: Condvar,
}

/// Runs a closure on one dedicated background thread at a fixed cadence.
///
/// The lifecycle is running → stopped; stopped is terminal and there is no
/// restart. [`stop`](Interval::stop) wakes a sleeping scheduler immediately,
/// but a tick already in progress always runs to completion — cancellation
/// is cooperative at sleep boundaries only.
pub struct Interval {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl Interval {
    /// Starts the scheduler. The first tick fires `start_offset` after this
    /// call; each subsequent tick fires `period` after the completion of the
    /// previous one.
    pub fn start<T>(start_offset: Duration, period: Duration, mut tick: T) -> Self
    where
        T: FnMut() + Send + 'static,
    {
        let shared = Arc::new(Shared {
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + start_offset;
            loop {
                if sleep_until(&thread_shared, deadline) {
                    return;
                }
                tick();
                deadline = Instant::now() + period;
            }
        });

        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Requests stop and wakes an in-progress sleep immediately.
    pub fn stop(&self) {
        let mut stopped = self.shared.stopped.lock().unwrap();
        *stopped = true;
        self.shared.wake.notify_all();
    }

    /// Blocks until the scheduler thread has exited. Nothing stops the
    /// scheduler from inside, so without a concurrent [`stop`](Self::stop)
    /// this blocks indefinitely.
    pub fn wait(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Sleeps until `deadline` or a stop request. Returns true when stopped.
///
/// The wait is predicate-guarded: spurious wakeups re-check the deadline,
/// and a stop signalled between checks is observed because the flag is read
/// under the same mutex the signaller holds.
fn sleep_until(shared: &Shared, deadline: Instant) -> bool {
    let mut stopped = shared.stopped.lock().unwrap();
    loop {
        if *stopped {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        let (guard, _) = shared
            .wake
            .wait_timeout(stopped, deadline - now)
            .unwrap();
        stopped = guard;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::mpsc;

    #[test]
    fn first_tick_fires_near_start() {
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let ticker = Interval::start(Duration::ZERO, Duration::from_secs(60), move || {
            let _ = tx.send(Instant::now());
        });

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(first.duration_since(started) < Duration::from_millis(500));
        ticker.stop();
        ticker.wait();
    }

    #[test]
    fn start_offset_delays_the_first_tick() {
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let ticker = Interval::start(
            Duration::from_millis(150),
            Duration::from_secs(60),
            move || {
                let _ = tx.send(Instant::now());
            },
        );

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(first.duration_since(started) >= Duration::from_millis(150));
        ticker.stop();
        ticker.wait();
    }

    #[test]
    fn period_is_measured_from_tick_completion() {
        let (tx, rx) = mpsc::channel();
        let ticker = Interval::start(Duration::ZERO, Duration::from_millis(100), move || {
            let _ = tx.send(Instant::now());
            // Make the tick itself cost real time: the gap between tick
            // starts must then exceed period + tick duration.
            thread::sleep(Duration::from_millis(50));
        });

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        ticker.stop();
        ticker.wait();

        assert!(second.duration_since(first) >= Duration::from_millis(150));
    }

    #[test]
    fn stop_wakes_a_sleeping_scheduler_promptly() {
        let ticker = Interval::start(Duration::from_secs(3600), Duration::from_secs(3600), || {});
        thread::sleep(Duration::from_millis(50));

        let stopping = Instant::now();
        ticker.stop();
        ticker.wait();
        assert!(stopping.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn in_flight_tick_runs_to_completion() {
        let completed = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&completed);
        let ticker = Interval::start(Duration::ZERO, Duration::from_secs(3600), move || {
            thread::sleep(Duration::from_millis(100));
            seen.fetch_add(1, Ordering::SeqCst);
        });

        // Stop while the first tick is still sleeping inside its body.
        thread::sleep(Duration::from_millis(30));
        ticker.stop();
        ticker.wait();
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_tick_after_stop() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        let ticker = Interval::start(Duration::ZERO, Duration::from_millis(20), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(100));
        ticker.stop();
        ticker.wait();
        let at_stop = count.load(Ordering::SeqCst);
        assert!(at_stop >= 2);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
    }

    #[test]
    fn drop_stops_and_joins() {
        let count = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&count);
        {
            let _ticker =
                Interval::start(Duration::from_secs(3600), Duration::from_secs(3600), move || {
                    seen.fetch_add(1, Ordering::SeqCst);
                });
            // Dropped while sleeping: must not hang, must not tick.
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
