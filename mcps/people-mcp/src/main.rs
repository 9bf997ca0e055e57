//! People MCP Server
//!
//! Serves the people CRUD tools over streamable HTTP (default) or stdio.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};

use people_mcp::{ErrorMode, PeopleConfig, PeopleMcpServer, ReadPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Persistent streamable HTTP server (SSE response streams)
    #[value(alias = "http")]
    Sse,
    /// One session over stdin/stdout
    Stdio,
}

#[derive(Parser)]
#[command(name = "people-mcp")]
#[command(about = "MCP server with CRUD tools over a SQLite people table")]
struct Cli {
    /// Transport to serve on
    #[arg(long = "server-type", alias = "server_type", value_enum, default_value_t = ServerType::Sse)]
    server_type: ServerType,

    /// Address for the HTTP transport
    #[arg(long, env = "PEOPLE_MCP_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Endpoint path for the HTTP transport
    #[arg(long, default_value = "/mcp")]
    path: String,

    /// Config file (defaults to ./people-mcp.toml, then the user config dir)
    #[arg(long, env = "PEOPLE_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file, overriding the config
    #[arg(long, env = "PEOPLE_MCP_DATABASE")]
    database: Option<PathBuf>,

    /// Refuse read_data statements that would write
    #[arg(long)]
    read_only_queries: bool,

    /// Report store failures as tool errors instead of false / []
    #[arg(long)]
    strict_errors: bool,

    /// Increase verbosity (-v debug, -vv trace). Default is info.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> Result<PeopleConfig> {
        let mut config = PeopleConfig::load(self.config.as_deref())?;

        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }
        if self.read_only_queries {
            config.tools.read_policy = ReadPolicy::ReadOnly;
        }
        if self.strict_errors {
            config.tools.error_mode = ErrorMode::Strict;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    mcp_common::init_tracing("people_mcp", cli.verbose)?;

    let config = cli.resolve_config()?;

    tracing::info!(
        database = %config.database.path.display(),
        read_policy = ?config.tools.read_policy,
        error_mode = ?config.tools.error_mode,
        "Starting people_mcp MCP Server"
    );

    match cli.server_type {
        ServerType::Stdio => mcp_common::serve_stdio(PeopleMcpServer::from_config(&config)).await,
        ServerType::Sse => {
            mcp_common::serve_http(
                move || Ok(PeopleMcpServer::from_config(&config)),
                cli.bind,
                &cli.path,
            )
            .await
        }
    }
}
