//! Tracing initialization for MCP servers
//!
//! Logs always go to stderr: stdout carries the protocol when a server runs
//! over stdio.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count onto the level used for the server's own crate.
///
/// - 0: info
/// - 1: debug (-v)
/// - 2+: trace (-vv)
pub fn level_for_verbosity(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Filter directives for the server crate and for this crate, whose
/// transport lines ("listening on", "shutting down") belong to the server's
/// output too.
pub fn directives(crate_name: &str, verbosity: u8) -> Vec<String> {
    let level = level_for_verbosity(verbosity).as_str().to_ascii_lowercase();
    let mut targets = vec![crate_name];
    if crate_name != env!("CARGO_CRATE_NAME") {
        targets.push(env!("CARGO_CRATE_NAME"));
    }

    targets
        .into_iter()
        .map(|target| format!("{}={}", target, level))
        .collect()
}

/// Initialize tracing/logging for an MCP server
///
/// `RUST_LOG` is honoured for every other target; the server crate and
/// `mcp_common` get the level derived from `verbosity`. Set `LOG_FORMAT=json` for
/// structured output, otherwise plain text without ANSI colors.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("people_mcp", cli.verbose)?;
/// ```
pub fn init_tracing(crate_name: &str, verbosity: u8) -> anyhow::Result<()> {
    let mut filter = EnvFilter::from_default_env();
    for directive in directives(crate_name, verbosity) {
        filter = filter.add_directive(directive.parse()?);
    }

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
