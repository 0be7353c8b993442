//! Interaction layer: prompt assembly, the Gemini adapter, the chat session
//! gateway and the navigation state machine that drives them.

pub mod gateway;
pub mod gemini_api_agent;
pub mod mission;
pub mod prompts;

pub use gateway::ChatSessionGateway;
pub use gemini_api_agent::{GeminiApiAgent, GeminiChatSession};
pub use mission::{IntentRejected, MissionControl, PendingReply};
