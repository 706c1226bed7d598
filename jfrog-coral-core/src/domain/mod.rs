pub mod types;

pub use types::{ChatMessage, Mention, MessageRole};
