//! Core services for coda-mcp.
//!
//! This crate owns the page export workflow used to read page content as
//! markdown, and a control plane that implements every document and page
//! operation exposed over MCP on top of a [`coda_api::CodaApi`].

pub mod control;
pub mod export;

pub use control::{CodaControlPlane, ControlError, CreatePageInput};
pub use export::{ExportError, ExportPolicy};
