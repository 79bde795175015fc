//! MCP server implementation for coda-mcp.
//!
//! This crate wires the coda-core control plane into rmcp tool handlers and
//! exposes the MCP-facing API surface for documents, pages and page content.
//! Every handler answers with a tool result; remote and export failures come
//! back as error-flagged results rather than protocol errors.

mod helpers;
mod tools;
pub mod server;

use coda_api::CodaApi;
use coda_core::CodaControlPlane;
use rmcp::{
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool_handler,
};
use rmcp::model::{ServerCapabilities, ServerInfo};

pub use tools::content::{PageContentParams, PeekPageParams, UpdateContentParams};
pub use tools::documents::{ListDocumentsParams, ResolveLinkParams};
pub use tools::pages::{CreatePageParams, ListPagesParams, PageRenameParams};

const SERVER_INSTRUCTIONS: &str = r"coda-mcp exposes Coda documents and pages as MCP tools.

Workflow:
1. Find a document with `coda_list_documents` (optional `query`), or resolve a browser URL with
   `coda_resolve_link` to get its `docId`.
2. List pages with `coda_list_pages`. Pass `nextPageToken` from a previous response to continue;
   a token overrides `limit`.
3. Read content as markdown with `coda_get_page_content`, or only the first lines with
   `coda_peek_page`. Reads export the page server-side and can take up to about 25 seconds.
4. Write with `coda_create_page`, `coda_replace_page_content`, `coda_append_page_content`,
   `coda_duplicate_page` and `coda_rename_page`.

Notes:
- `pageIdOrName` accepts a page id or a page name.
- Content is always markdown.
- Failures are returned as tool results flagged `isError`,
  with text `Failed to <operation>: <cause>`.";

/// MCP server wrapper around the control plane and tool routers.
pub struct CodaMcp<A: CodaApi> {
    tool_router: ToolRouter<Self>,
    control: CodaControlPlane<A>,
}

impl<A: CodaApi> Clone for CodaMcp<A> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
        }
    }
}

impl<A: CodaApi> CodaMcp<A> {
    /// Creates a new server over a control plane.
    #[must_use]
    pub fn new(control: CodaControlPlane<A>) -> Self {
        let tool_router = Self::tool_router_documents()
            + Self::tool_router_pages()
            + Self::tool_router_content();
        Self {
            tool_router,
            control,
        }
    }

    #[must_use]
    pub const fn control(&self) -> &CodaControlPlane<A> {
        &self.control
    }
}

#[tool_handler]
impl<A: CodaApi> ServerHandler for CodaMcp<A> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
