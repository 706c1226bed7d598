mod catalogue;
mod connection;
mod error;
mod interface;
pub mod local;
mod process;
mod registry;
mod sse;

pub use catalogue::{RejectedTool, ToolBinding, ToolCatalogue, find_refs};
pub use error::ToolInvokeError;
pub use interface::{ServerToolInfo, ToolServerInterface};
pub use local::LocalToolSet;
pub use registry::{LOCAL_SERVER_NAME, ToolRegistry};
