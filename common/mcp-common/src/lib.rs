//! MCP Common - Shared utilities for MCP servers
//!
//! - **Initialization**: [`init_tracing`] for stderr logging
//! - **Transports**: [`serve_stdio`] and [`serve_http`]
//! - **Results**: [`json_success`] for JSON tool responses
//! - **Errors**: helpers for building MCP errors
//! - **Embeddable**: [`EmbeddableMcp`] for in-process tool calls
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{init_tracing, serve_stdio};
//!
//! init_tracing("people_mcp", 0)?;
//! serve_stdio(PeopleMcpServer::from_config(&config)).await?;
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;
pub mod serve;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, invalid_params, McpResult};
pub use init::init_tracing;
pub use result::{json_payload, json_success};
pub use serve::{serve_http, serve_http_until, serve_stdio};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
