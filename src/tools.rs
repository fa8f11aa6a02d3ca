//! Tools offered to the model on every reply.

mod definitions;
mod executor;

pub use definitions::{ToolName, get_tool_definitions};
pub use executor::{SELF_PORTRAIT_PLACEHOLDER, ToolInvocation, ToolOutput};
