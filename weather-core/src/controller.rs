//! Request lifecycle for a single city lookup and the UI state it drives.
//!
//! Every submission walks `Loading -> {Success, Error}` (or straight to `Error` when
//! the input is blank). Submissions may overlap and are not ordered: whichever lookup
//! resolves last owns the displayed state. Each submission is numbered when issued;
//! the number only shows up in logs.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::JoinHandle;

use crate::{
    error::{LookupError, TransportError},
    model::{Query, WeatherResult},
    provider::WeatherProvider,
    render::{DisplayUpdate, render},
};

pub const LOADING_MESSAGE: &str = "Lade Daten...";
pub const ENTER_KEY: &str = "Enter";

/// What the interface currently shows. Exactly one state is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(WeatherResult),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

impl MessageKind {
    /// CSS colour of the status region for this kind of message.
    pub fn color(self) -> &'static str {
        match self {
            MessageKind::Info => "#0a0",
            MessageKind::Error => "#c00",
        }
    }
}

/// Handle to the widgets the controller updates.
///
/// Implementations must not block; they are called while the state lock is held.
pub trait View: Send + Sync {
    /// Replace the status text. An empty `text` clears the region.
    fn show_message(&self, text: &str, kind: MessageKind);

    fn hide_result(&self);

    /// Fill the result region and make it visible.
    fn show_result(&self, update: &DisplayUpdate);
}

#[derive(Debug)]
pub struct RequestController<P, V> {
    provider: P,
    view: V,
    state: Mutex<UiState>,
    generation: AtomicU64,
}

impl<P, V> RequestController<P, V>
where
    P: WeatherProvider,
    V: View,
{
    pub fn new(provider: P, view: V) -> Self {
        Self {
            provider,
            view,
            state: Mutex::new(UiState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> UiState {
        self.lock_state().clone()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate `raw_input`, look it up and show the outcome.
    ///
    /// Never fails: every error ends up as [`UiState::Error`]. Dropping the future
    /// while the lookup is pending settles a `Loading` state to the generic error.
    pub async fn submit(&self, raw_input: &str) {
        if let Some((generation, query)) = self.begin(raw_input) {
            self.resolve(generation, query).await;
        }
    }

    /// Pointer activation of the trigger control.
    pub async fn on_click(&self, raw_input: &str) {
        self.submit(raw_input).await;
    }

    /// Key press while the input has focus; only "Enter" submits.
    pub async fn on_key(&self, key: &str, raw_input: &str) {
        if key == ENTER_KEY {
            self.submit(raw_input).await;
        }
    }

    /// Back to `Idle`: message cleared, result hidden. A lookup still in flight
    /// overwrites this when it resolves.
    pub fn reset(&self) {
        let generation = self.next_generation();
        self.transition(generation, UiState::Idle);
    }

    // Issues the submission: numbers it and moves to Loading, or to Error when the
    // input is blank. Returns the query to fetch, if any.
    fn begin(&self, raw_input: &str) -> Option<(u64, Query)> {
        let generation = self.next_generation();

        match Query::parse(raw_input) {
            Ok(query) => {
                self.transition(generation, UiState::Loading);
                Some((generation, query))
            }
            Err(err) => {
                tracing::debug!(generation, "rejected blank city input");
                self.transition(generation, UiState::Error(err.user_message()));
                None
            }
        }
    }

    async fn resolve(&self, generation: u64, query: Query) {
        let mut settle = Settle {
            controller: self,
            generation,
            resolved: false,
        };

        let outcome = self.provider.current_weather(&query).await;
        settle.resolved = true;

        let next = match outcome {
            Ok(result) => UiState::Success(result),
            Err(err) => {
                match &err {
                    LookupError::Transport(cause) => {
                        tracing::warn!(city = %query, generation, %cause, "weather lookup failed")
                    }
                    _ => tracing::debug!(city = %query, generation, error = %err, "weather lookup failed"),
                }
                UiState::Error(err.user_message())
            }
        };

        self.transition(generation, next);
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, generation: u64, next: UiState) {
        let mut state = self.lock_state();

        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            tracing::debug!(generation, latest, "older submission resolved after a newer one");
        }

        self.paint(&next);
        *state = next;
    }

    // A lookup that will never resolve must not leave the interface loading.
    fn abandon(&self, generation: u64) {
        let mut state = self.lock_state();
        if *state != UiState::Loading {
            return;
        }

        tracing::warn!(generation, "lookup dropped before it resolved");
        let next = UiState::Error(LookupError::from(TransportError::Abandoned).user_message());
        self.paint(&next);
        *state = next;
    }

    fn paint(&self, state: &UiState) {
        match state {
            UiState::Idle => {
                self.view.show_message("", MessageKind::Info);
                self.view.hide_result();
            }
            UiState::Loading => {
                self.view.show_message(LOADING_MESSAGE, MessageKind::Info);
                self.view.hide_result();
            }
            UiState::Success(result) => {
                self.view.show_message("", MessageKind::Info);
                self.view.show_result(&render(result));
            }
            UiState::Error(message) => {
                self.view.show_message(message, MessageKind::Error);
                self.view.hide_result();
            }
        }
    }
}

// Settles the state if the lookup future is dropped (or panics) before resolving.
struct Settle<'a, P: WeatherProvider, V: View> {
    controller: &'a RequestController<P, V>,
    generation: u64,
    resolved: bool,
}

impl<P: WeatherProvider, V: View> Drop for Settle<'_, P, V> {
    fn drop(&mut self) {
        if !self.resolved {
            self.controller.abandon(self.generation);
        }
    }
}

/// A lookup running on its own task.
///
/// It cannot be cancelled; dropping the handle detaches the task.
#[derive(Debug)]
pub struct Submission(JoinHandle<()>);

impl Submission {
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    /// Wait until the lookup has resolved and the state has been updated.
    pub async fn finished(self) {
        if let Err(err) = self.0.await {
            tracing::warn!(error = %err, "lookup task failed");
        }
    }
}

impl<P, V> RequestController<P, V>
where
    P: WeatherProvider + 'static,
    V: View + 'static,
{
    /// Issue a submission now and resolve it on a detached task.
    ///
    /// Validation and the move to `Loading` happen before this returns. Returns
    /// `None` when the input was blank and no lookup was started.
    pub fn spawn_submit(self: &Arc<Self>, raw_input: &str) -> Option<Submission> {
        let (generation, query) = self.begin(raw_input)?;
        let controller = Arc::clone(self);
        Some(Submission(tokio::spawn(async move {
            controller.resolve(generation, query).await;
        })))
    }
}
