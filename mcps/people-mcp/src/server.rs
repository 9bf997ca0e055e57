//! MCP Server implementation for the people table
//!
//! Tools delegate to the handlers module; the server itself only carries the
//! store settings and the error mode.

use mcp_common::{async_trait, EmbeddableError, EmbeddableMcp, EmbeddableResult};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde_json::Value;

use crate::config::{ErrorMode, PeopleConfig, ReadPolicy};
use crate::handlers;
use crate::params::*;
use crate::store::PeopleStore;

/// The main People MCP Server
#[derive(Clone)]
pub struct PeopleMcpServer {
    store: PeopleStore,
    error_mode: ErrorMode,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl PeopleMcpServer {
    pub fn from_config(config: &PeopleConfig) -> Self {
        Self {
            store: PeopleStore::from_config(config),
            error_mode: config.tools.error_mode,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add a person to the people table. Returns true if the insert succeeded.")]
    async fn add_data(
        &self,
        Parameters(params): Parameters<AddDataParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::add_data(&self.store, self.error_mode, params).await
    }

    #[tool(description = "Read data from the people table using a SQL SELECT query. Defaults to \
                          'SELECT * FROM people'. Returns rows as arrays of column values.")]
    async fn read_data(
        &self,
        Parameters(params): Parameters<ReadDataParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::read_data(&self.store, self.error_mode, params).await
    }

    #[tool(description = "Update age and/or profession of every person with the given name. \
                          Returns true if at least one row changed.")]
    async fn update_data(
        &self,
        Parameters(params): Parameters<UpdateDataParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::update_data(&self.store, self.error_mode, params).await
    }

    #[tool(description = "Delete every person with the given name from the people table. \
                          Returns true if at least one row was removed.")]
    async fn delete_data(
        &self,
        Parameters(params): Parameters<DeleteDataParams>,
    ) -> Result<CallToolResult, McpError> {
        handlers::delete_data(&self.store, self.error_mode, params).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for PeopleMcpServer {
    fn get_info(&self) -> ServerInfo {
        let reads = match self.store.read_policy() {
            ReadPolicy::Passthrough => "read_data runs any single statement and discards its changes",
            ReadPolicy::ReadOnly => "read_data only accepts statements that do not write",
        };
        let errors = match self.error_mode {
            ErrorMode::Sentinel => "failures are reported as false or an empty list",
            ErrorMode::Strict => "failures are reported as tool errors",
        };

        ServerInfo {
            instructions: Some(format!(
                "SQLite people table (id, name, age, profession). \
                Use add_data to insert, read_data to query, update_data to change age or \
                profession by name, and delete_data to remove by name. Currently {}; {}.",
                reads, errors
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for PeopleMcpServer {
    fn server_name(&self) -> &str {
        "people"
    }

    fn server_description(&self) -> Option<&str> {
        Some("CRUD tools over a SQLite people table (name, age, profession).")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match name {
            "add_data" => {
                let params: AddDataParams = serde_json::from_value(params)?;
                self.add_data(Parameters(params)).await.map_err(Into::into)
            }
            "read_data" => {
                let params: ReadDataParams = serde_json::from_value(params)?;
                self.read_data(Parameters(params)).await.map_err(Into::into)
            }
            "update_data" => {
                let params: UpdateDataParams = serde_json::from_value(params)?;
                self.update_data(Parameters(params)).await.map_err(Into::into)
            }
            "delete_data" => {
                let params: DeleteDataParams = serde_json::from_value(params)?;
                self.delete_data(Parameters(params)).await.map_err(Into::into)
            }
            _ => Err(EmbeddableError::ToolNotFound(name.to_string())),
        }
    }
}
