//! Coral multi-agent session: receive mentions from other agents, answer
//! each one with the agent loop, and reply in the same thread.

mod mention;
mod session;

pub use mention::{mention_text, parse_mentions};
pub use session::{CoralSession, SessionError, SessionOptions};

pub const WAIT_FOR_MENTIONS: &str = "wait_for_mentions";
pub const SEND_MESSAGE: &str = "send_message";
