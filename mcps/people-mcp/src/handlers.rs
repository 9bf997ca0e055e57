//! Handler implementations for people-mcp tools
//!
//! Each handler runs the store operation matching the configured
//! [`ErrorMode`] and wraps the outcome in a JSON `CallToolResult`.

use mcp_common::{
    internal_error, invalid_params, json_success, CallToolResult, McpError, McpResult,
};

use crate::config::ErrorMode;
use crate::error::StoreError;
use crate::params::*;
use crate::store::PeopleStore;

fn to_mcp_error(operation: &str, err: StoreError) -> McpError {
    tracing::warn!("Error {}: {}", operation, err);
    if err.is_caller_error() {
        invalid_params(err.to_string())
    } else {
        internal_error(format!("Failed {}: {}", operation, err))
    }
}

pub async fn add_data(
    store: &PeopleStore,
    mode: ErrorMode,
    params: AddDataParams,
) -> McpResult<CallToolResult> {
    let added = match mode {
        ErrorMode::Sentinel => store.add(&params.name, params.age, &params.profession),
        ErrorMode::Strict => {
            store
                .try_add(&params.name, params.age, &params.profession)
                .map_err(|e| to_mcp_error("adding data", e))?;
            true
        }
    };

    json_success(&added)
}

pub async fn read_data(
    store: &PeopleStore,
    mode: ErrorMode,
    params: ReadDataParams,
) -> McpResult<CallToolResult> {
    let rows = match mode {
        ErrorMode::Sentinel => store.read(Some(&params.query)),
        ErrorMode::Strict => store
            .try_read(&params.query)
            .map_err(|e| to_mcp_error("reading data", e))?,
    };

    json_success(&rows)
}

pub async fn update_data(
    store: &PeopleStore,
    mode: ErrorMode,
    params: UpdateDataParams,
) -> McpResult<CallToolResult> {
    let patch = params.patch();
    let updated = match mode {
        ErrorMode::Sentinel => store.update(&params.name, &patch),
        ErrorMode::Strict => {
            store
                .try_update(&params.name, &patch)
                .map_err(|e| to_mcp_error("updating data", e))?
                > 0
        }
    };

    json_success(&updated)
}

pub async fn delete_data(
    store: &PeopleStore,
    mode: ErrorMode,
    params: DeleteDataParams,
) -> McpResult<CallToolResult> {
    let deleted = match mode {
        ErrorMode::Sentinel => store.delete(&params.name),
        ErrorMode::Strict => {
            store
                .try_delete(&params.name)
                .map_err(|e| to_mcp_error("deleting data", e))?
                > 0
        }
    };

    json_success(&deleted)
}
