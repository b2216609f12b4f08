//! Tenants domain module.
//!
//! Read-only lookup of `tenant_key -> {menu, metadata}`, fetched once per
//! process from the backing document store and cached first-read-wins.
//!
//! - `model.rs` - menu item and tenant context records
//! - `source.rs` - the fetch itself (HTTP store export, or a static map)
//! - `catalog.rs` - the compute-once cache in front of a source
//! - `error.rs` - tenant-specific error types

mod catalog;
mod error;
mod model;
mod source;

pub use catalog::TenantCatalog;
pub use error::TenantError;
pub use model::{format_price, resolve_item, MenuItem, TenantContext};
pub use source::{HttpTenantSource, StaticTenantSource, TenantSource};
