//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`, `MessageId`)
//! - `transcript`: Append-only log and identifier sequence (`Transcript`, `MessageSequence`)
//! - `view`: View state and the presentation snapshot (`ViewState`, `MissionSnapshot`)

mod message;
mod transcript;
mod view;

pub use message::{ChatMessage, MessageId, MessageRole};
pub use transcript::{MessageSequence, Transcript};
pub use view::{MissionSnapshot, ViewState};
