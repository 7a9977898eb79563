//! MCP tool implementations
//!
//! The three tools exposed by searchgate: session authentication,
//! stateless token validation, and the gated web search.

pub mod authenticate;
pub mod handler;
pub mod registry;
pub mod validate_token;
pub mod web_search;

pub use authenticate::AuthenticateHandler;
pub use handler::{text_content, McpToolHandler};
pub use registry::ToolRegistry;
pub use validate_token::ValidateTokenHandler;
pub use web_search::WebSearchHandler;
