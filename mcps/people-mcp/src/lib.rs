//! People MCP Library
//!
//! Create, read, update and delete tools over a single SQLite table of
//! people (`id`, `name`, `age`, `profession`).
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use people_mcp::{PeopleConfig, PeopleMcpServer, PeopleStore};
//!
//! let store = PeopleStore::new("demo.db");
//! store.add("Ada", 30, "Engineer");
//!
//! let server = PeopleMcpServer::from_config(&PeopleConfig::with_database("demo.db"));
//! // Serve via stdio or streamable HTTP, or call tools through EmbeddableMcp
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod params;
pub mod server;
pub mod store;

// Re-export main server type
pub use server::PeopleMcpServer;

pub use config::{ErrorMode, PeopleConfig, ReadPolicy};
pub use error::{StoreError, StoreResult};
pub use store::{PeopleStore, PersonPatch, Row, DEFAULT_READ_QUERY};

// Re-export parameter types for direct API usage
pub use params::*;
