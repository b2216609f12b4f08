//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `context.rs` - Shared collaborators injected into every tool
//! - `router.rs` - Dynamic ToolRouter builder
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params and `execute()`
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//!
//! The router is built dynamically; `server.rs` needs no changes.

pub mod context;
pub mod definitions;
pub mod router;

pub use context::ToolContext;
pub use router::build_tool_router;
