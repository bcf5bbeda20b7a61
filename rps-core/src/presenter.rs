//! Drives a single fetch and publishes its progress to whoever is watching.
//!
//! A [`FetchPresenter`] owns one `watch` channel holding the current
//! [`FetchState`]. Display surfaces call [`FetchPresenter::subscribe`] and
//! redraw whenever the value changes. At most one fetch is in flight per
//! presenter: starting while a fetch is pending is ignored. Dropping the
//! presenter aborts the pending fetch so its result is thrown away.

use serde::{Deserialize, Serialize};
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::{sync::watch, task::AbortHandle};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, FetchError};

pub mod quote;
pub mod weather;

pub use quote::QuotePresenter;
pub use weather::WeatherPresenter;

/// `None` until the first fetch starts.
pub type StateReceiver<T> = watch::Receiver<Option<FetchState<T>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchState<T> {
    Loading,
    Success(T),
    Failed(FetchFailure),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            FetchState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// What a display surface needs to know about a failed fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&FetchError> for FetchFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A fetch was already pending; nothing was started.
    AlreadyInFlight,
}

pub struct FetchPresenter<T> {
    flow: &'static str,
    state: Arc<watch::Sender<Option<FetchState<T>>>>,
    task: Mutex<Option<AbortHandle>>,
}

impl<T> FetchPresenter<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `flow` names the presenter in log output.
    pub fn new(flow: &'static str) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            flow,
            state: Arc::new(state),
            task: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> StateReceiver<T> {
        self.state.subscribe()
    }

    pub fn state(&self) -> Option<FetchState<T>> {
        self.state.borrow().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(*self.state.borrow(), Some(FetchState::Loading))
    }

    /// Spawn `fetch` on the runtime and report its outcome through the state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&self, fetch: F) -> StartOutcome
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        if !self.begin() {
            return StartOutcome::AlreadyInFlight;
        }

        let state = Arc::clone(&self.state);
        let flow = self.flow;
        let handle = tokio::spawn(async move {
            let outcome = fetch.await;
            settle(&state, flow, outcome);
        });

        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle.abort_handle());
        StartOutcome::Started
    }

    /// Like [`FetchPresenter::start`], but awaits the fetch in place.
    ///
    /// If the returned future is dropped early the state becomes
    /// `Failed` with kind `Unknown`, so later starts are not blocked.
    pub async fn run<F>(&self, fetch: F) -> StartOutcome
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        if !self.begin() {
            return StartOutcome::AlreadyInFlight;
        }

        let mut guard = InlineFetch {
            state: self.state.as_ref(),
            flow: self.flow,
            settled: false,
        };
        let outcome = fetch.await;
        settle(guard.state, guard.flow, outcome);
        guard.settled = true;

        StartOutcome::Started
    }

    /// Moves to `Loading` unless a fetch is already pending.
    fn begin(&self) -> bool {
        let started = self.state.send_if_modified(|state| {
            if matches!(state, Some(FetchState::Loading)) {
                false
            } else {
                *state = Some(FetchState::Loading);
                true
            }
        });

        if started {
            info!(flow = self.flow, "fetch started");
        } else {
            debug!(flow = self.flow, "fetch already in flight, ignoring start");
        }
        started
    }
}

impl<T> Drop for FetchPresenter<T> {
    fn drop(&mut self) {
        let slot = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

struct InlineFetch<'a, T> {
    state: &'a watch::Sender<Option<FetchState<T>>>,
    flow: &'static str,
    settled: bool,
}

impl<T> Drop for InlineFetch<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            settle(
                self.state,
                self.flow,
                Err(FetchError::Unknown("fetch was cancelled".into())),
            );
        }
    }
}

fn settle<T>(
    state: &watch::Sender<Option<FetchState<T>>>,
    flow: &'static str,
    outcome: Result<T, FetchError>,
) {
    let next = match outcome {
        Ok(value) => {
            info!(flow, "fetch succeeded");
            FetchState::Success(value)
        }
        Err(err) => {
            warn!(flow, kind = ?err.kind(), error = %err, "fetch failed");
            FetchState::Failed(FetchFailure::from(&err))
        }
    };
    state.send_replace(Some(next));
}
