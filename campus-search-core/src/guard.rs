//! Issue-order acceptance for overlapping asynchronous requests.
//!
//! Interactive search issues a new request on every keystroke. Responses can
//! complete in any order, so a fast answer to an old keystroke may arrive
//! after a slow answer to a newer one. [`StaleResponseGuard`] compares *issue*
//! timestamps and applies a success only when no later-issued attempt has
//! already been accepted.
//!
//! Failures are always delivered, even for superseded attempts. Callers must
//! tolerate an error callback for a request the user has already moved past.
//!
//! Superseded operations are not cancelled; they run to completion and their
//! output is discarded.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use log::debug;

/// Source of issue timestamps.
///
/// Readings must never decrease.
pub trait Clock: Send + Sync {
    /// Current reading in clock ticks.
    fn now(&self) -> u64;
}

/// Monotonic clock counting nanoseconds since it was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// What a guarded completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The success callback ran.
    Accepted,
    /// The operation succeeded but a later-issued attempt had already been
    /// accepted; no callback ran.
    Stale,
    /// The failure callback ran.
    Failed,
}

/// Applies only the most recently issued successful response.
///
/// One guard belongs to one logical input control. Clones share the same
/// acceptance state, so tracked operations can be spawned onto other tasks.
///
/// # Examples
///
/// ```
/// use campus_search_core::{Completion, StaleResponseGuard};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let guard = StaleResponseGuard::new();
/// let completion = guard
///     .track(async { Ok::<_, String>(vec!["Morrill Science Center"]) })
///     .on_complete(|list| assert_eq!(list.len(), 1), |_| {})
///     .await;
/// assert_eq!(completion, Completion::Accepted);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct StaleResponseGuard<C = MonotonicClock> {
    last_accepted: Arc<AtomicU64>,
    clock: C,
}

impl StaleResponseGuard<MonotonicClock> {
    /// Create a guard on a fresh monotonic clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for StaleResponseGuard<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> StaleResponseGuard<C> {
    /// Create a guard whose acceptance threshold starts at the clock's current
    /// reading.
    pub fn with_clock(clock: C) -> Self {
        let seed = clock.now();
        Self {
            last_accepted: Arc::new(AtomicU64::new(seed)),
            clock,
        }
    }

    /// Issue timestamp of the most recently accepted attempt.
    #[must_use]
    pub fn last_accepted(&self) -> u64 {
        self.last_accepted.load(Ordering::Acquire)
    }

    /// Register `operation` as the next attempt this guard acts on.
    ///
    /// Tracking a new operation does not cancel earlier ones.
    pub fn track<F>(&self, operation: F) -> Tracked<F, C> {
        Tracked {
            guard: self.clone(),
            operation,
        }
    }

    /// Advance the threshold to `issued` unless a later attempt was accepted.
    ///
    /// Ties are accepted. The compare and the store happen as one atomic step
    /// so concurrent completions cannot both pass a stale check.
    fn try_accept(&self, issued: u64) -> bool {
        self.last_accepted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                (issued >= last).then_some(issued)
            })
            .is_ok()
    }
}

/// An operation registered with a [`StaleResponseGuard`].
#[derive(Debug)]
#[must_use = "a tracked operation does nothing until `on_complete` is awaited"]
pub struct Tracked<F, C = MonotonicClock> {
    guard: StaleResponseGuard<C>,
    operation: F,
}

impl<F, T, E, C> Tracked<F, C>
where
    F: Future<Output = Result<T, E>>,
    C: Clock + Clone,
{
    /// Attach completion callbacks and stamp the attempt's issue time.
    ///
    /// The issue time is read when this method is called, not when the
    /// returned future is first polled. On success `on_success` runs only if
    /// no later-issued attempt has been accepted; on failure `on_failure`
    /// always runs.
    pub fn on_complete<S, X>(self, on_success: S, on_failure: X) -> impl Future<Output = Completion>
    where
        S: FnOnce(T),
        X: FnOnce(E),
    {
        let issued = self.guard.clock.now();
        let Self { guard, operation } = self;
        async move {
            match operation.await {
                Ok(value) => {
                    if guard.try_accept(issued) {
                        on_success(value);
                        Completion::Accepted
                    } else {
                        debug!(
                            "discarding stale response issued at {issued}, newer accepted at {}",
                            guard.last_accepted()
                        );
                        Completion::Stale
                    }
                }
                Err(error) => {
                    on_failure(error);
                    Completion::Failed
                }
            }
        }
    }
}
