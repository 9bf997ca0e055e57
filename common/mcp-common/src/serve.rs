//! Transport serving
//!
//! Two ways to expose a server:
//!
//! - [`serve_stdio`]: a single session over stdin/stdout, ending when the
//!   peer closes the stream.
//! - [`serve_http`]: MCP streamable HTTP (SSE response streams) on a TCP
//!   address. Every session gets a fresh handler from the factory. Runs until
//!   Ctrl-C, or until a cancellation token fires with [`serve_http_until`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rmcp::{
    transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
    },
    ServerHandler, ServiceExt,
};
use tokio_util::sync::CancellationToken;

/// Serve one MCP session over stdio and wait for it to finish
pub async fn serve_stdio<S>(server: S) -> anyhow::Result<()>
where
    S: ServerHandler,
{
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start stdio transport")?;

    tracing::info!("Server running on stdio, waiting for requests...");

    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

/// Serve MCP streamable HTTP at `addr`, mounting the endpoint under `path`
///
/// Stops on Ctrl-C.
///
/// # Example
///
/// ```rust,ignore
/// let config = config.clone();
/// mcp_common::serve_http(
///     move || Ok(PeopleMcpServer::from_config(&config)),
///     "127.0.0.1:8000".parse()?,
///     "/mcp",
/// )
/// .await?;
/// ```
pub async fn serve_http<S, F>(factory: F, addr: SocketAddr, path: &str) -> anyhow::Result<()>
where
    S: ServerHandler,
    F: Fn() -> Result<S, std::io::Error> + Send + Sync + 'static,
{
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl-C"),
            Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
        }
        trigger.cancel();
    });

    serve_http_until(factory, addr, path, shutdown).await
}

/// Like [`serve_http`], but stops when `shutdown` is cancelled
///
/// Open sessions, including long-lived SSE streams, are cancelled together
/// with the listener so graceful shutdown does not wait on them.
pub async fn serve_http_until<S, F>(
    factory: F,
    addr: SocketAddr,
    path: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()>
where
    S: ServerHandler,
    F: Fn() -> Result<S, std::io::Error> + Send + Sync + 'static,
{
    let service = StreamableHttpService::new(
        factory,
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            cancellation_token: shutdown.child_token(),
            ..Default::default()
        },
    );

    let router = axum::Router::new().nest_service(path, service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on http://{}{}", local_addr, path);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server shutting down");
    Ok(())
}
