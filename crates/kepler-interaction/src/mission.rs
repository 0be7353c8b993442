//! Navigation state machine.
//!
//! `MissionControl` owns the view state, the transcript and the pending-reply
//! flag, and turns student intents into transitions. Gateway calls run as
//! spawned tasks; their outcome is appended to the transcript that is
//! current when they settle.

use crate::gateway::ChatSessionGateway;
use crate::prompts;
use kepler_core::catalog::{Catalog, Planet};
use kepler_core::error::GatewayError;
use kepler_core::session::{
    MessageRole, MessageSequence, MissionSnapshot, Transcript, ViewState,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why an intent was not applied. Rejected intents have no side effects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentRejected {
    #[error("the mission briefing has not been dismissed yet")]
    BriefingActive,
    #[error("the briefing was already dismissed")]
    BriefingAlreadyDismissed,
    #[error("a planet is already under analysis; return to the overview first")]
    PlanetAlreadyFocused,
    #[error("no planet is under analysis")]
    NoPlanetFocused,
    #[error("Mission Command is still replying")]
    ReplyPending,
    #[error("message is empty")]
    EmptyMessage,
    #[error("unknown planet '{0}'")]
    UnknownPlanet(String),
}

/// Handle to the background work started by an intent.
///
/// Await [`PendingReply::settled`] to wait for the transcript update, or drop
/// the handle to let it finish on its own.
#[derive(Debug)]
pub struct PendingReply {
    handle: JoinHandle<()>,
}

impl PendingReply {
    /// Waits until the gateway call has settled and its outcome is recorded.
    pub async fn settled(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("[Mission] Background task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

struct MissionState {
    view: ViewState,
    transcript: Transcript,
    sequence: MessageSequence,
    pending_reply: bool,
}

impl MissionState {
    fn append(&mut self, role: MessageRole, text: impl Into<String>) {
        let Self {
            transcript,
            sequence,
            ..
        } = self;
        transcript.append(sequence, role, text);
    }
}

struct MissionInner {
    catalog: Catalog,
    gateway: Arc<ChatSessionGateway>,
    state: Mutex<MissionState>,
}

impl MissionInner {
    fn lock_state(&self) -> MutexGuard<'_, MissionState> {
        // State stays consistent between statements, so a poisoned lock is usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The mission session: one student, one view, one transcript.
#[derive(Clone)]
pub struct MissionControl {
    inner: Arc<MissionInner>,
}

impl MissionControl {
    /// Starts a session on the briefing overlay.
    pub fn new(catalog: Catalog, gateway: Arc<ChatSessionGateway>) -> Self {
        Self {
            inner: Arc::new(MissionInner {
                catalog,
                gateway,
                state: Mutex::new(MissionState {
                    view: ViewState::Briefing,
                    transcript: Transcript::new(),
                    sequence: MessageSequence::new(),
                    pending_reply: false,
                }),
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn gateway(&self) -> &Arc<ChatSessionGateway> {
        &self.inner.gateway
    }

    pub fn view(&self) -> ViewState {
        self.inner.lock_state().view
    }

    pub fn is_reply_pending(&self) -> bool {
        self.inner.lock_state().pending_reply
    }

    /// Copies the current state for rendering.
    pub fn snapshot(&self) -> MissionSnapshot {
        let state = self.inner.lock_state();
        MissionSnapshot {
            view: state.view,
            transcript: state.transcript.clone(),
            pending_reply: state.pending_reply,
            briefing_dismissed: !state.view.is_briefing(),
        }
    }

    /// Hides the briefing and opens the system overview.
    ///
    /// The conversation is opened in the background. A failure only appends a
    /// notice; the overview is interactive either way.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; the background work is
    /// started with `tokio::spawn`.
    pub fn dismiss_briefing(&self) -> Result<PendingReply, IntentRejected> {
        {
            let mut state = self.inner.lock_state();
            if !state.view.is_briefing() {
                return Err(IntentRejected::BriefingAlreadyDismissed);
            }
            state.view = ViewState::SolarSystemOverview;
            state.transcript = Transcript::new();
        }
        tracing::info!("[Mission] Briefing dismissed");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            if let Err(e) = inner.gateway.ensure_session().await {
                tracing::warn!("[Mission] Chat initialization failed after briefing: {}", e);
                inner
                    .lock_state()
                    .append(MessageRole::SystemNotice, prompts::connection_issue(e.user_message()));
            }
        });
        Ok(PendingReply { handle })
    }

    /// Focuses a planet from the overview.
    ///
    /// The view switches immediately. Once the conversation is available a
    /// greeting is appended; if it cannot be opened a notice is appended
    /// instead.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; the background work is
    /// started with `tokio::spawn`.
    pub fn select_planet(&self, planet_id: &str) -> Result<PendingReply, IntentRejected> {
        let planet = self
            .inner
            .catalog
            .planet(planet_id)
            .ok_or_else(|| IntentRejected::UnknownPlanet(planet_id.to_string()))?;

        {
            let mut state = self.inner.lock_state();
            match state.view {
                ViewState::Briefing => return Err(IntentRejected::BriefingActive),
                ViewState::PlanetAnalysis { .. } => {
                    return Err(IntentRejected::PlanetAlreadyFocused);
                }
                ViewState::SolarSystemOverview => {}
            }
            // A reply to an earlier message may still be on its way
            if state.pending_reply {
                return Err(IntentRejected::ReplyPending);
            }
            if state.transcript.is_closed() {
                state.transcript = Transcript::new();
            }
            state.view = ViewState::PlanetAnalysis { planet };
            state.pending_reply = true;
        }
        tracing::info!("[Mission] Focusing on {}", planet.id);

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let result = inner.gateway.ensure_session().await;
            let mut state = inner.lock_state();
            match result {
                Ok(()) => state.append(MessageRole::Assistant, prompts::focus_greeting(planet)),
                Err(e) => {
                    tracing::warn!("[Mission] Could not greet on {}: {}", planet.id, e);
                    state.append(MessageRole::SystemNotice, focus_failure_notice(&e, planet));
                }
            }
            state.pending_reply = false;
        });
        Ok(PendingReply { handle })
    }

    /// Leaves the analysis view and closes the transcript of this focus
    /// period.
    pub fn back(&self) -> Result<(), IntentRejected> {
        let mut state = self.inner.lock_state();
        let view = state.view;
        match view {
            ViewState::Briefing => Err(IntentRejected::BriefingActive),
            ViewState::SolarSystemOverview => Err(IntentRejected::NoPlanetFocused),
            ViewState::PlanetAnalysis { planet } => {
                state.append(MessageRole::SystemNotice, prompts::RETURNING_TO_OVERVIEW);
                state.transcript.close();
                state.view = ViewState::SolarSystemOverview;
                tracing::info!("[Mission] Leaving {}", planet.id);
                Ok(())
            }
        }
    }

    /// Sends the student's message about the focused planet.
    ///
    /// The user message is appended before the request starts; the reply or a
    /// failure notice follows when it settles.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; the background work is
    /// started with `tokio::spawn`.
    pub fn send_message(&self, text: &str) -> Result<PendingReply, IntentRejected> {
        let planet = {
            let mut state = self.inner.lock_state();
            let planet = match state.view {
                ViewState::Briefing => return Err(IntentRejected::BriefingActive),
                ViewState::SolarSystemOverview => return Err(IntentRejected::NoPlanetFocused),
                ViewState::PlanetAnalysis { planet } => planet,
            };
            if state.pending_reply {
                return Err(IntentRejected::ReplyPending);
            }
            if text.trim().is_empty() {
                return Err(IntentRejected::EmptyMessage);
            }
            state.append(MessageRole::User, text);
            state.pending_reply = true;
            planet
        };

        let inner = Arc::clone(&self.inner);
        let text = text.to_string();
        let handle = tokio::spawn(async move {
            let result = inner.gateway.send(&text, planet).await;
            let mut state = inner.lock_state();
            match result {
                Ok(reply) => state.append(MessageRole::Assistant, reply),
                Err(e) => {
                    tracing::error!("[Mission] Error sending message: {}", e);
                    state.append(
                        MessageRole::SystemNotice,
                        prompts::technical_difficulties(e.user_message()),
                    );
                }
            }
            state.pending_reply = false;
        });
        Ok(PendingReply { handle })
    }

    /// Answers a general question outside the tutoring conversation. The
    /// transcript is not touched.
    pub async fn quick_answer(&self, prompt: &str) -> Result<String, GatewayError> {
        self.inner.gateway.ask_once(prompt).await
    }
}

fn focus_failure_notice(error: &GatewayError, planet: &Planet) -> String {
    if error.is_credentials_missing() {
        prompts::CREDENTIALS_NOT_CONFIGURED.to_string()
    } else {
        prompts::focus_connection_failed(planet)
    }
}
