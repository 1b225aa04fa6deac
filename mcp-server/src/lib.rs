// MCP surface over the xoso-lookup core
pub mod mcp_handler;
pub mod use_cases;

pub use mcp_handler::*;
pub use use_cases::*;
