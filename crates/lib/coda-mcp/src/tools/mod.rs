//! MCP tool modules.
//!
//! Tools are grouped by domain: document discovery and link resolution, page
//! management, and page content reads and writes.

pub mod content;
pub mod documents;
pub mod pages;
