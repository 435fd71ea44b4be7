//! # CineScan Runtime
//!
//! Store runtime for the CineScan ticket scanner.
//!
//! This crate provides the Store that coordinates reducer execution and
//! effect handling. The Store is the single controller that owns all state:
//! `send` and `state` are its only mutation/read entry points, so no
//! ambient globals exist anywhere in the system.
//!
//! ## Core Components
//!
//! - **Store**: the runtime that manages state and executes effects
//! - **Effect Executor**: runs effect descriptions and feeds produced
//!   actions back into the reducer
//! - **Action Broadcast**: observers (renderers, tests) can subscribe to
//!   actions produced by effects
//!
//! ## Example
//!
//! ```ignore
//! use cinescan_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! let handle = store.send(Action::DoSomething).await;
//! handle.wait().await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use cinescan_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Timeout waiting for effects to complete
        #[error("Timeout waiting for effects")]
        Timeout,
    }
}

pub use error::StoreError;

/// Tracks outstanding effects spawned for one `send` call.
///
/// The pending count lives in a `watch` channel so handles can await it
/// reaching zero without polling.
#[derive(Clone)]
struct EffectTracking {
    pending: Arc<watch::Sender<usize>>,
}

impl EffectTracking {
    fn new() -> (EffectHandle, Self) {
        let (tx, rx) = watch::channel(0usize);
        (
            EffectHandle { pending: rx },
            Self {
                pending: Arc::new(tx),
            },
        )
    }

    fn increment(&self) {
        self.pending.send_modify(|n| *n += 1);
    }

    fn decrement(&self) {
        self.pending.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Decrements the pending-effect count when dropped.
///
/// Ensures the count is updated even if an effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Handle for awaiting completion of the effects started by one `send`
///
/// `send()` returns after *starting* effect execution, not after completion.
/// Await the handle when a test or caller needs the effects (and any actions
/// they produce) to have finished.
///
/// Actions fed back into the store by effects start their own effect cycles;
/// those cascading cycles are not tracked by the original handle.
#[derive(Debug)]
pub struct EffectHandle {
    pending: watch::Receiver<usize>,
}

impl EffectHandle {
    /// A handle whose effects have already completed
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(0usize);
        Self { pending: rx }
    }

    /// Wait for all tracked effects to complete
    pub async fn wait(&mut self) {
        // Closed channel means every tracking clone was dropped, and the
        // drop guards decrement before that can happen.
        let _ = self.pending.wait_for(|pending| *pending == 0).await;
    }

    /// Wait for all tracked effects to complete, with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the effects do not complete within
    /// the given duration.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// The Store - runtime for a reducer-driven feature
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with action feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Action broadcast channel for observing actions produced by effects.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// Default action broadcast capacity is 16; use
    /// [`Store::with_broadcast_capacity`] for observers that may lag.
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
    }

    /// Create a new store with a custom action broadcast capacity
    #[must_use]
    pub fn with_broadcast_capacity(
        initial_state: S,
        reducer: R,
        environment: E,
        capacity: usize,
    ) -> Self {
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// This is the primary way to interact with the store:
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes returned effects in spawned tasks
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// Multiple concurrent `send` calls serialize at the reducer, so state
    /// transitions are processed one at a time.
    ///
    /// Returns an [`EffectHandle`] that can be awaited for effect
    /// completion.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> EffectHandle
    where
        R: Clone,
        E: Clone,
    {
        tracing::debug!("Processing action");
        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectTracking::new();

        let effects = {
            let mut state = self.state.write().await;

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!("Reducer completed, returned {} effects", effects.len());
            effects
        };

        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        handle
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure so the read lock is released promptly:
    ///
    /// ```ignore
    /// let phase = store.state(|s| s.phase.clone()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to all actions produced by effects
    ///
    /// Only actions produced by effects are broadcast, not the initial
    /// actions passed to `send`. If the receiver lags it skips old actions
    /// and receives `RecvError::Lagged`.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Execute a single effect description
    ///
    /// `None` is a no-op. `Delay` and `Future` are spawned; if they produce
    /// an action it is broadcast to observers and fed back into the store.
    /// Effect failures never halt the store.
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking)
    where
        R: Clone,
        E: Clone,
    {
        match effect {
            Effect::None => {
                tracing::trace!("Executing Effect::None (no-op)");
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                tracing::trace!("Executing Effect::Future");
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                tracking.increment();

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);

                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action");
                        let _ = store.action_broadcast.send(action.clone());
                        let _ = store.send(action).await;
                    }
                });
            },
            Effect::Delay { duration, action } => {
                tracing::trace!("Executing Effect::Delay (duration: {:?})", duration);
                metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                tracking.increment();

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);

                    tokio::time::sleep(duration).await;
                    let _ = store.action_broadcast.send((*action).clone());
                    let _ = store.send(*action).await;
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}
