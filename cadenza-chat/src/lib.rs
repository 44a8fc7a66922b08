//! # cadenza-chat
//!
//! Session-level services for the Cadenza voice chat: the single-slot
//! session cache, the typed intent-dispatch registry, and the chat-history
//! log with its on-disk export. The chat loop itself — language model
//! calls, prompt templating, retrieval — lives outside this workspace;
//! these services are what it plugs into.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod cache;
pub mod dispatch;
pub mod history;

pub use cache::SessionCache;
pub use dispatch::{call_intent, DispatchError, Intent, IntentOutput};
pub use history::ChatHistory;
