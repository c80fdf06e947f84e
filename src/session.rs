//! Background recomputation with stale-result discarding
//!
//! Each [`AnalysisSession::submit`] starts a fresh run on its own thread and
//! gets a ticket from a monotonically increasing counter. Runs are never
//! interrupted; when a run finishes after a newer one has already been
//! published, its outcome is dropped.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::analysis::Analysis;
use crate::config::AnalysisConfig;
use crate::error::{FemError, FemResult};

/// Outcome of a run together with the ticket that requested it
#[derive(Debug, Clone)]
pub struct Published {
    pub ticket: u64,
    pub outcome: Arc<FemResult<Analysis>>,
}

#[derive(Debug, Default)]
struct State {
    latest: Option<Published>,
    in_flight: usize,
    discarded: u64,
}

#[derive(Debug, Default)]
struct Shared {
    next_ticket: AtomicU64,
    state: Mutex<State>,
    idle: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a finished run and return the outcome now current
    fn publish(&self, ticket: u64, outcome: FemResult<Analysis>) -> Published {
        let mut state = self.lock();
        let current = match &state.latest {
            Some(current) if current.ticket > ticket => {
                log::warn!(
                    "discarding result of run {ticket}, run {} already published",
                    current.ticket
                );
                let current = current.clone();
                state.discarded += 1;
                current
            }
            _ => {
                if let Err(err) = &outcome {
                    log::debug!("run {ticket} failed: {err}");
                }
                let published = Published {
                    ticket,
                    outcome: Arc::new(outcome),
                };
                state.latest = Some(published.clone());
                published
            }
        };
        state.in_flight -= 1;
        if state.in_flight == 0 {
            self.idle.notify_all();
        }
        current
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "run panicked".to_string())
}

/// Run to completion, turning a panic into an aborted outcome
fn guarded<F>(run: F) -> FemResult<Analysis>
where
    F: FnOnce() -> FemResult<Analysis>,
{
    panic::catch_unwind(AssertUnwindSafe(run))
        .unwrap_or_else(|payload| Err(FemError::Aborted(panic_message(payload.as_ref()))))
}

/// Owner of the most recent analysis of an interactive front end
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    shared: Arc<Shared>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run in the background and return its ticket
    pub fn submit(&self, config: AnalysisConfig) -> u64 {
        self.spawn(move || config.run())
    }

    // Every ticket is published exactly once, even when the run panics,
    // so wait_idle always returns
    fn spawn<F>(&self, run: F) -> u64
    where
        F: FnOnce() -> FemResult<Analysis> + Send + 'static,
    {
        let ticket = self.shared.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.lock().in_flight += 1;

        let shared = Arc::clone(&self.shared);
        thread::spawn(move || {
            let outcome = guarded(run);
            shared.publish(ticket, outcome);
        });
        log::debug!("submitted run {ticket}");
        ticket
    }

    /// Run on the calling thread, publishing like a submitted run
    ///
    /// Returns the outcome current afterwards, which belongs to a newer
    /// ticket if one finished first.
    pub fn run_blocking(&self, config: &AnalysisConfig) -> Published {
        let ticket = self.shared.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.lock().in_flight += 1;
        self.shared.publish(ticket, guarded(|| config.run()))
    }

    /// Newest published outcome, if any run has completed
    pub fn latest(&self) -> Option<Published> {
        self.shared.lock().latest.clone()
    }

    /// Block until no run is in flight
    pub fn wait_idle(&self) {
        let mut state = self.shared.lock();
        while state.in_flight > 0 {
            state = self
                .shared
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Number of completed runs dropped as stale
    pub fn discarded(&self) -> u64 {
        self.shared.lock().discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_latest_is_newest_ticket() {
        let session = AnalysisSession::new();
        let mut last = 0;
        for n in 1..=6 {
            last = session.submit(AnalysisConfig::quad(n, 2).unwrap());
        }
        session.wait_idle();

        let latest = session.latest().unwrap();
        assert_eq!(latest.ticket, last);
        assert!(latest.outcome.is_ok());
    }

    #[test]
    fn test_failed_run_is_published_as_error() {
        let session = AnalysisSession::new();
        session.submit(AnalysisConfig::beam(5, 2).unwrap());
        session.wait_idle();
        let latest = session.latest().unwrap();
        let err = latest.outcome.as_ref().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularSystem);
    }

    #[test]
    fn test_older_result_is_discarded() {
        let session = AnalysisSession::new();
        let config = AnalysisConfig::axial_bar(2).unwrap();
        let newer = session.run_blocking(&config);
        assert_eq!(newer.ticket, 1);

        // A ticket older than the published one completes late
        session.shared.lock().in_flight += 1;
        session.shared.publish(0, config.run());
        assert_eq!(session.latest().unwrap().ticket, 1);
        assert_eq!(session.discarded(), 1);
    }

    #[test]
    fn test_panicking_run_still_reaches_idle() {
        let session = AnalysisSession::new();
        let ticket = session.spawn(|| panic!("stiffness kernel blew up"));
        session.wait_idle();

        let latest = session.latest().unwrap();
        assert_eq!(latest.ticket, ticket);
        let err = latest.outcome.as_ref().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Aborted);
        assert!(err.to_string().contains("stiffness kernel blew up"));

        // The session keeps working afterwards
        session.submit(AnalysisConfig::axial_bar(2).unwrap());
        session.wait_idle();
        assert!(session.latest().unwrap().outcome.is_ok());
    }

    #[test]
    fn test_wait_idle_without_runs_returns() {
        let session = AnalysisSession::new();
        session.wait_idle();
        assert!(session.latest().is_none());
    }
}
