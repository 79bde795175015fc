use std::num::NonZeroU32;

use coda_api::CodaApi;
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

/// Parameters identifying a page to read.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageContentParams {
    /// The ID of the document that contains the page to get the content of
    pub doc_id: String,
    /// The ID or name of the page to get the content of
    pub page_id_or_name: String,
}

/// Parameters for reading the first lines of a page.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeekPageParams {
    /// The ID of the document that contains the page to peek into
    pub doc_id: String,
    /// The ID or name of the page to peek into
    pub page_id_or_name: String,
    /// The number of lines to return from the start of the page - usually 30 lines is enough
    pub num_lines: NonZeroU32,
}

/// Parameters for replacing or appending page content.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentParams {
    /// The ID of the document that contains the page
    pub doc_id: String,
    /// The ID or name of the page
    pub page_id_or_name: String,
    /// The markdown content to write
    pub content: String,
}

#[tool_router(router = tool_router_content, vis = "pub")]
impl<A: CodaApi> CodaMcp<A> {
    #[tool(description = "Get the content of a page as markdown")]
    async fn coda_get_page_content(
        &self,
        Parameters(params): Parameters<PageContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .get_page_content(&params.doc_id, &params.page_id_or_name)
            .await;
        Ok(helpers::text_result("get page content", result))
    }

    #[tool(description = "Peek into the beginning of a page and return a limited number of lines")]
    async fn coda_peek_page(
        &self,
        Parameters(params): Parameters<PeekPageParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let num_lines = usize::try_from(params.num_lines.get()).unwrap_or(usize::MAX);
        let result = self
            .control
            .peek_page(&params.doc_id, &params.page_id_or_name, num_lines)
            .await;
        Ok(helpers::text_result("peek page", result))
    }

    #[tool(description = "Replace the content of a page with new markdown content")]
    async fn coda_replace_page_content(
        &self,
        Parameters(params): Parameters<UpdateContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .replace_page_content(&params.doc_id, &params.page_id_or_name, params.content)
            .await;
        Ok(helpers::json_result("replace page content", result))
    }

    #[tool(description = "Append new markdown content to the end of a page")]
    async fn coda_append_page_content(
        &self,
        Parameters(params): Parameters<UpdateContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self
            .control
            .append_page_content(&params.doc_id, &params.page_id_or_name, params.content)
            .await;
        Ok(helpers::json_result("append page content", result))
    }
}
