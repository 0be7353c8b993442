//! Scripted conversation backend shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use kepler_core::agent::{ConversationBackend, ConversationSession, SessionConfig};
use kepler_core::catalog::Catalog;
use kepler_core::error::GatewayError;
use kepler_interaction::{ChatSessionGateway, MissionControl};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

#[derive(Default)]
struct Script {
    opens: AtomicUsize,
    open_failures: Mutex<VecDeque<GatewayError>>,
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    sent: Mutex<Vec<String>>,
    configs: Mutex<Vec<SessionConfig>>,
    open_gate: Option<Arc<Semaphore>>,
    reply_gate: Option<Arc<Semaphore>>,
}

/// Backend whose outcomes are queued up front by the test.
#[derive(Clone, Default)]
pub struct FakeBackend {
    script: Arc<Script>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session construction waits for a permit on the returned semaphore.
    pub fn with_open_gate(self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = self.rebuild(|script| script.open_gate = Some(Arc::clone(&gate)));
        (backend, gate)
    }

    /// Every reply waits for a permit on the returned semaphore.
    pub fn with_reply_gate(self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = self.rebuild(|script| script.reply_gate = Some(Arc::clone(&gate)));
        (backend, gate)
    }

    fn rebuild(self, configure: impl FnOnce(&mut Script)) -> Self {
        let mut script = Arc::try_unwrap(self.script)
            .unwrap_or_else(|_| panic!("configure the backend before sharing it"));
        configure(&mut script);
        Self {
            script: Arc::new(script),
        }
    }

    /// The next session construction fails with `error`.
    pub fn fail_next_open(&self, error: GatewayError) {
        self.script.open_failures.lock().unwrap().push_back(error);
    }

    pub fn push_reply(&self, reply: &str) {
        self.script
            .replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: GatewayError) {
        self.script.replies.lock().unwrap().push_back(Err(error));
    }

    /// Number of session construction attempts.
    pub fn opens(&self) -> usize {
        self.script.opens.load(Ordering::SeqCst)
    }

    /// Messages the sessions received, envelope included.
    pub fn sent(&self) -> Vec<String> {
        self.script.sent.lock().unwrap().clone()
    }

    pub fn configs(&self) -> Vec<SessionConfig> {
        self.script.configs.lock().unwrap().clone()
    }
}

async fn pass(gate: &Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.unwrap().forget();
    }
}

#[async_trait]
impl ConversationBackend for FakeBackend {
    async fn open_session(
        &self,
        config: SessionConfig,
    ) -> Result<Arc<dyn ConversationSession>, GatewayError> {
        self.script.opens.fetch_add(1, Ordering::SeqCst);
        pass(&self.script.open_gate).await;

        if let Some(error) = self.script.open_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.script.configs.lock().unwrap().push(config);
        Ok(Arc::new(FakeSession {
            script: Arc::clone(&self.script),
        }))
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        Ok(format!("one-shot: {prompt}"))
    }
}

struct FakeSession {
    script: Arc<Script>,
}

#[async_trait]
impl ConversationSession for FakeSession {
    async fn send_message(&self, text: &str) -> Result<String, GatewayError> {
        self.script.sent.lock().unwrap().push(text.to_string());
        pass(&self.script.reply_gate).await;

        self.script
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Copy that.".to_string()))
    }
}

pub fn gateway(backend: &FakeBackend) -> Arc<ChatSessionGateway> {
    Arc::new(ChatSessionGateway::new(
        Arc::new(backend.clone()),
        Catalog::seeded(),
    ))
}

pub fn mission(backend: &FakeBackend) -> MissionControl {
    MissionControl::new(Catalog::seeded(), gateway(backend))
}

/// Mission past the briefing with the session already open.
pub async fn mission_on_overview(backend: &FakeBackend) -> MissionControl {
    let mission = mission(backend);
    mission
        .dismiss_briefing()
        .expect("Should dismiss briefing")
        .settled()
        .await;
    mission
}

/// Mission focused on `planet_id` with the greeting delivered.
pub async fn mission_focused(backend: &FakeBackend, planet_id: &str) -> MissionControl {
    let mission = mission_on_overview(backend).await;
    mission
        .select_planet(planet_id)
        .expect("Should select planet")
        .settled()
        .await;
    mission
}
