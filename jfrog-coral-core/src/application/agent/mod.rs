//! # Agent Module
//!
//! Turns one natural-language instruction into zero or more JFrog tool calls
//! and a final answer, using a JSON directive protocol with the model.
//!
//! ## Agent Loop
//!
//! 1. Send the instruction and the tool catalogue to the model
//! 2. Parse the JSON directive (asking the model to correct malformed JSON)
//! 3. On `call_tool`, run the tool and feed its result back
//! 4. On `final`, return the answer

mod context;
mod directive;
mod errors;
mod models;
mod runner;
mod runtime;


pub use context::{ServerGuidance, ToolContext, ToolDescriptor};
pub use directive::AgentDirective;
pub use errors::AgentError;
pub use models::{AgentOptions, AgentOutcome, AgentStep};
pub use runner::Agent;
pub use runtime::{ToolExecution, ToolRuntime};
