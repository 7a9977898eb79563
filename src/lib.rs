//! searchgate - Session-Gated MCP Web Search Server
//!
//! Exposes three remotely callable tools (authenticate,
//! validate_token, web_search) over JSON-RPC 2.0, gating the
//! privileged search behind per-session authentication.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types
//!   - session (concurrent registry with idle expiry)
//!   - auth (shared-secret and signed-claims validation)
//!   - search (gateway to the external provider)
//!   - services (unified service container)
//!
//! - **http**: Axum adapter (depends on core)
//!   - JSON-RPC endpoint, SSE heartbeats, status endpoints
//!
//! - **mcp**: JSON-RPC dispatcher and stdio adapter (depends on core)
//!   - protocol, handlers, tools
//!
//! # Key Features
//!
//! - Self-expiring session registry (background sweep)
//! - Authentication gate enforced before privileged tools
//! - Two validator strategies selected by configuration
//! - SSE heartbeat streams per session

// Core domain logic (protocol-agnostic)
pub mod core;

// HTTP adapter
pub mod http;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{GateError, Result};
pub use core::services::Services;
pub use core::session::{Session, SessionStore};
pub use core::types::*;
