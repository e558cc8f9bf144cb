//! Independent periodic polling loops.
//!
//! Each feed gets its own loop on its own cadence. A tick that arrives while
//! the previous fetch of that feed is still running is skipped, so a slow
//! endpoint never piles up requests. Loops end on [`PollingScheduler::stop`]
//! or as soon as the session liveness channel reports the session gone.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::port::{ConsoleEvent, Feed, Notifier};

/// One unit of periodic work.
#[async_trait]
pub trait PollJob: Send + Sync {
    fn feed(&self) -> Feed;

    async fn run(&self) -> Result<()>;
}

/// A job and the period it runs on.
#[derive(Clone)]
pub struct PollSpec {
    pub job: Arc<dyn PollJob>,
    pub period: Duration,
}

impl PollSpec {
    #[must_use]
    pub fn new(job: Arc<dyn PollJob>, period: Duration) -> Self {
        Self { job, period }
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    loops: Vec<JoinHandle<()>>,
}

pub struct PollingScheduler {
    notifier: Arc<dyn Notifier>,
    running: Mutex<Option<Running>>,
}

impl PollingScheduler {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            running: Mutex::new(None),
        }
    }

    /// Spawn one loop per spec. Any loops from a previous start are stopped
    /// first. The first tick of each loop fires one period after start.
    pub fn start(&self, specs: Vec<PollSpec>, liveness: watch::Receiver<bool>) {
        self.stop();

        let (shutdown, shutdown_rx) = watch::channel(false);
        let loops = specs
            .into_iter()
            .map(|spec| {
                tokio::spawn(poll_loop(
                    spec,
                    Arc::clone(&self.notifier),
                    shutdown_rx.clone(),
                    liveness.clone(),
                ))
            })
            .collect::<Vec<_>>();

        info!(loops = loops.len(), "Polling started");
        *self.running.lock() = Some(Running { shutdown, loops });
    }

    /// Stop every loop and abort fetches still in flight.
    pub fn stop(&self) {
        let Some(running) = self.running.lock().take() else {
            return;
        };
        running.shutdown.send_replace(true);
        for handle in running.loops {
            handle.abort();
        }
        info!("Polling stopped");
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .is_some_and(|r| r.loops.iter().any(|h| !h.is_finished()))
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    spec: PollSpec,
    notifier: Arc<dyn Notifier>,
    mut shutdown: watch::Receiver<bool>,
    mut liveness: watch::Receiver<bool>,
) {
    let feed = spec.job.feed();
    let mut ticks = interval_at(Instant::now() + spec.period, spec.period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            result = liveness.changed() => {
                if result.is_err() || !*liveness.borrow() {
                    debug!(%feed, "Session ended, stopping poll loop");
                    break;
                }
            }
            _ = ticks.tick() => {
                if in_flight.as_ref().is_some_and(|h| !h.is_finished()) {
                    debug!(%feed, "Previous fetch still running, skipping tick");
                    continue;
                }
                let job = Arc::clone(&spec.job);
                let notifier = Arc::clone(&notifier);
                in_flight = Some(tokio::spawn(async move {
                    if let Err(e) = job.run().await {
                        warn!(%feed, error = %e, "Poll failed");
                        notifier.notify(ConsoleEvent::RefreshFailed {
                            feed,
                            reason: e.to_string(),
                        });
                    }
                }));
            }
        }
    }

    if let Some(handle) = in_flight {
        handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::testkit::RecordingNotifier;

    struct CountingJob {
        runs: AtomicU32,
        work: Duration,
        fail: bool,
    }

    impl CountingJob {
        fn new(work: Duration) -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicU32::new(0),
                work,
                fail: false,
            })
        }

        fn runs(&self) -> u32 {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PollJob for CountingJob {
        fn feed(&self) -> Feed {
            Feed::Status
        }

        async fn run(&self) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.work).await;
            if self.fail {
                return Err(Error::Connection("refused".into()));
            }
            Ok(())
        }
    }

    fn scheduler() -> (PollingScheduler, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (
            PollingScheduler::new(Arc::clone(&notifier) as Arc<dyn Notifier>),
            notifier,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let (scheduler, _) = scheduler();
        let (_live, liveness) = watch::channel(true);
        let job = CountingJob::new(Duration::ZERO);
        scheduler.start(
            vec![PollSpec::new(job.clone(), Duration::from_secs(5))],
            liveness,
        );

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(job.runs(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(job.runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_suppresses_overlapping_ticks() {
        let (scheduler, _) = scheduler();
        let (_live, liveness) = watch::channel(true);
        let job = CountingJob::new(Duration::from_secs(12));
        scheduler.start(
            vec![PollSpec::new(job.clone(), Duration::from_secs(5))],
            liveness,
        );

        // Ticks at 5, 10, 15, 20: 5 starts a fetch running until 17,
        // 10 and 15 are skipped, 20 starts the second fetch.
        tokio::time::sleep(Duration::from_secs(21)).await;

        assert_eq!(job.runs(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn loops_run_on_independent_cadences() {
        let (scheduler, _) = scheduler();
        let (_live, liveness) = watch::channel(true);
        let fast = CountingJob::new(Duration::ZERO);
        let slow = CountingJob::new(Duration::ZERO);
        scheduler.start(
            vec![
                PollSpec::new(fast.clone(), Duration::from_secs(5)),
                PollSpec::new(slow.clone(), Duration::from_secs(60)),
            ],
            liveness,
        );

        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(fast.runs(), 12);
        assert_eq!(slow.runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_end_stops_loops() {
        let (scheduler, _) = scheduler();
        let (live, liveness) = watch::channel(true);
        let job = CountingJob::new(Duration::ZERO);
        scheduler.start(
            vec![PollSpec::new(job.clone(), Duration::from_secs(5))],
            liveness,
        );

        tokio::time::sleep(Duration::from_secs(6)).await;
        live.send_replace(false);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(job.runs(), 1);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_polling() {
        let (scheduler, _) = scheduler();
        let (_live, liveness) = watch::channel(true);
        let job = CountingJob::new(Duration::ZERO);
        scheduler.start(
            vec![PollSpec::new(job.clone(), Duration::from_secs(5))],
            liveness,
        );

        scheduler.stop();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(job.runs(), 0);
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported_and_retried() {
        let (scheduler, notifier) = scheduler();
        let (_live, liveness) = watch::channel(true);
        let job = Arc::new(CountingJob {
            runs: AtomicU32::new(0),
            work: Duration::ZERO,
            fail: true,
        });
        scheduler.start(
            vec![PollSpec::new(job.clone(), Duration::from_secs(5))],
            liveness,
        );

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(job.runs(), 2);
        assert_eq!(notifier.events().len(), 2);
        assert!(notifier.banners().is_empty());
    }
}
