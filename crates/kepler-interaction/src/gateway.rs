//! Chat session gateway.
//!
//! Owns the single conversation with Mission Command and mediates every
//! exchange with it.

use crate::prompts;
use futures::future::{BoxFuture, FutureExt, Shared};
use kepler_core::agent::{ConversationBackend, ConversationSession, SessionConfig};
use kepler_core::catalog::{Catalog, Planet};
use kepler_core::error::GatewayError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type SessionResult = Result<Arc<dyn ConversationSession>, GatewayError>;
type SharedAttempt = Shared<BoxFuture<'static, SessionResult>>;

#[derive(Default)]
struct SessionSlot {
    session: Option<Arc<dyn ConversationSession>>,
    /// Construction currently running, tagged with its attempt number.
    in_flight: Option<(u64, SharedAttempt)>,
    attempts: u64,
}

/// Lazily opens one conversation and relays messages to it.
///
/// The conversation is opened at most once. Concurrent callers of
/// [`ChatSessionGateway::ensure_session`] share the same in-flight
/// construction and all receive its outcome, success or failure. A failed
/// construction leaves nothing behind, so a later call tries again. The
/// conversation survives focus changes.
pub struct ChatSessionGateway {
    backend: Arc<dyn ConversationBackend>,
    catalog: Catalog,
    slot: Mutex<SessionSlot>,
}

impl ChatSessionGateway {
    pub fn new(backend: Arc<dyn ConversationBackend>, catalog: Catalog) -> Self {
        Self {
            backend,
            catalog,
            slot: Mutex::new(SessionSlot::default()),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds the fixed configuration for a new conversation.
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(prompts::system_instruction(&self.catalog))
    }

    fn start_attempt(&self) -> SharedAttempt {
        let backend = Arc::clone(&self.backend);
        let config = self.session_config();
        async move {
            tracing::info!("[Gateway] Opening Mission Command session");
            let result = backend.open_session(config).await;
            match &result {
                Ok(_) => tracing::info!("[Gateway] Mission Command session established"),
                Err(e) => tracing::error!("[Gateway] Failed to open session: {}", e),
            }
            result
        }
        .boxed()
        .shared()
    }

    /// Opens the conversation if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `CredentialsMissing` when the credential is absent or invalid,
    /// `GatewayUnavailable` for any other construction failure.
    pub async fn ensure_session(&self) -> Result<(), GatewayError> {
        self.session().await.map(|_| ())
    }

    async fn session(&self) -> SessionResult {
        let (id, attempt) = {
            let mut slot = self.lock_slot();
            if let Some(session) = &slot.session {
                return Ok(Arc::clone(session));
            }
            let existing = slot
                .in_flight
                .as_ref()
                .map(|(id, attempt)| (*id, attempt.clone()));
            match existing {
                Some(shared) => shared,
                None => {
                    slot.attempts += 1;
                    let id = slot.attempts;
                    let attempt = self.start_attempt();
                    slot.in_flight = Some((id, attempt.clone()));
                    (id, attempt)
                }
            }
        };

        let result = attempt.await;

        let mut slot = self.lock_slot();
        // The first waiter to settle records the outcome; a reset in between
        // discards it
        if matches!(&slot.in_flight, Some((current, _)) if *current == id) {
            slot.in_flight = None;
            if let Ok(session) = &result {
                slot.session = Some(Arc::clone(session));
            }
        }
        result
    }

    /// Returns true once a conversation has been opened.
    pub fn has_session(&self) -> bool {
        self.lock_slot().session.is_some()
    }

    /// Sends the student's text, wrapped with the focused planet's context.
    ///
    /// Opens the conversation first when necessary.
    ///
    /// # Errors
    ///
    /// `CredentialsMissing`, `RateLimited` or `GatewayFailure` from the
    /// exchange, or the construction error if the conversation could not be
    /// opened.
    pub async fn send(&self, text: &str, planet: &Planet) -> Result<String, GatewayError> {
        let session = self.session().await?;
        let message = prompts::envelope(text, planet);

        tracing::debug!(
            "[Gateway] Sending message (planet: {}, {} chars)",
            planet.id,
            text.len()
        );
        let result = session.send_message(&message).await;
        if let Err(e) = &result {
            tracing::warn!("[Gateway] Message to Mission Command failed: {}", e);
        }
        result
    }

    /// One-shot question outside the tutoring conversation.
    pub async fn ask_once(&self, prompt: &str) -> Result<String, GatewayError> {
        tracing::debug!("[Gateway] One-shot question ({} chars)", prompt.len());
        self.backend.generate(prompt).await
    }

    /// Drops the conversation so the next call opens a fresh one.
    ///
    /// A construction already in flight still settles for its waiters, but
    /// its session is not kept.
    pub fn reset(&self) {
        let mut slot = self.lock_slot();
        slot.session = None;
        slot.in_flight = None;
        tracing::info!("[Gateway] Session reset");
    }
}
