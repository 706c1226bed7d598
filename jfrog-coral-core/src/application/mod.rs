//! # Application Module
//!
//! - [`client`] - Conversation front-end for the configured model
//! - [`agent`] - JSON-directive tool loop answering one instruction
//! - [`tooling`] - MCP transports, tool registry and local build tools
//! - [`coral`] - Mention wait/reply loop against the Coral server

pub mod agent;
pub mod client;
pub mod coral;
pub mod tooling;
