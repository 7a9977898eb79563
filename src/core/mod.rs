//! Core domain logic for searchgate (protocol-agnostic)
//!
//! Contains the session registry, token validation strategies, the
//! search gateway, configuration, error types, and the unified
//! service container. Adapters (http, mcp) depend on this module and
//! never the other way around.

pub mod auth;
pub mod config;
pub mod error;
pub mod search;
pub mod services;
pub mod session;
pub mod types;
