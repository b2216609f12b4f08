//! Food-Order MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server backing a
//! conversational food-ordering assistant with two tools: a menu
//! lookup/recommendation tool and an order-cart management tool, both backed
//! by per-session in-memory state and a tenant-scoped menu fetched from a
//! document store.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   the server handler, and the transport layer
//! - **domains**: Business logic organized by bounded contexts
//!   - **tenants**: tenant catalog fetched once per process and cached
//!   - **sessions**: per-session phase, browsing context, cart and notes
//!   - **intent**: the classifier seam between free text and the menu engine
//!   - **menu**: category navigation and recommendation answers
//!   - **orders**: the strict command grammar and the cart state machine
//!   - **tools**: the MCP tools wiring it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use food_order_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
