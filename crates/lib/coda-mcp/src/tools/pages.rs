use std::num::NonZeroU32;

use coda_api::CodaApi;
use coda_core::CreatePageInput;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{CodaMcp, helpers};

/// Parameters for listing pages in a document.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPagesParams {
    /// The ID of the document to list pages from
    pub doc_id: String,
    /// The number of pages to return - optional, defaults to 25
    pub limit: Option<NonZeroU32>,
    /// The token need to get the next page of results, returned from a previous
    /// call to this tool - optional
    pub next_page_token: Option<String>,
}

/// Parameters for creating a page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageParams {
    /// The ID of the document to create the page in
    pub doc_id: String,
    /// The name of the page to create
    pub name: String,
    /// The markdown content of the page to create - optional
    pub content: Option<String>,
    /// The ID of the parent page to create this page under - optional
    pub parent_page_id: Option<String>,
}

/// Parameters for duplicating or renaming a page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageRenameParams {
    /// The ID of the document that contains the page
    pub doc_id: String,
    /// The ID or name of the page
    pub page_id_or_name: String,
    /// The name for the resulting page
    pub new_name: String,
}

#[tool_router(router = tool_router_pages, vis = "pub")]
impl<A: CodaApi> CodaMcp<A> {
    #[tool(description = "List pages in the current document with pagination")]
    async fn coda_list_pages(
        &self,
        Parameters(params): Parameters<ListPagesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .list_pages(
                &params.doc_id,
                params.limit.map(NonZeroU32::get),
                params.next_page_token,
            )
            .await;
        Ok(helpers::json_result("list pages", result))
    }

    #[tool(description = "Create a page in the current document")]
    async fn coda_create_page(
        &self,
        Parameters(params): Parameters<CreatePageParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .create_page(
                &params.doc_id,
                CreatePageInput {
                    name: params.name,
                    content: params.content,
                    parent_page_id: params.parent_page_id,
                },
            )
            .await;
        Ok(helpers::json_result("create page", result))
    }

    #[tool(description = "Duplicate a page in the current document")]
    async fn coda_duplicate_page(
        &self,
        Parameters(params): Parameters<PageRenameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .duplicate_page(&params.doc_id, &params.page_id_or_name, params.new_name)
            .await;
        Ok(helpers::json_result("duplicate page", result))
    }

    #[tool(description = "Rename a page in the current document")]
    async fn coda_rename_page(
        &self,
        Parameters(params): Parameters<PageRenameParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .rename_page(&params.doc_id, &params.page_id_or_name, params.new_name)
            .await;
        Ok(helpers::json_result("rename page", result))
    }
}
