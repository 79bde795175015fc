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

/// Parameters for listing or searching documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsParams {
    /// The query to search for documents by - optional
    pub query: Option<String>,
}

/// Parameters for resolving a browser link.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveLinkParams {
    /// The URL to resolve
    pub url: String,
}

#[tool_router(router = tool_router_documents, vis = "pub")]
impl<A: CodaApi> CodaMcp<A> {
    #[tool(description = "List or search available documents")]
    async fn coda_list_documents(
        &self,
        Parameters(params): Parameters<ListDocumentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.control.list_documents(params.query).await;
        Ok(helpers::json_result("list documents", result))
    }

    #[tool(description = "Resolve metadata given a browser link to a Coda object")]
    async fn coda_resolve_link(
        &self,
        Parameters(params): Parameters<ResolveLinkParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = self.control.resolve_link(&params.url).await;
        Ok(helpers::json_result("resolve link", result))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use coda_api::ApiError;
    use coda_api::models::ListDocsQuery;
    use coda_api::testing::{MockCodaApi, RecordedCall};
    use coda_core::CodaControlPlane;
    use serde_json::json;

    use super::*;
    use crate::helpers::test_support::{is_error, text_of};

    fn server(api: MockCodaApi) -> (CodaMcp<MockCodaApi>, Arc<MockCodaApi>) {
        let api = Arc::new(api);
        (CodaMcp::new(CodaControlPlane::from_arc(api.clone())), api)
    }

    #[tokio::test]
    async fn lists_documents_with_query() {
        let docs = json!({ "items": [{ "id": "123", "name": "Test Document" }] });
        let (server, api) = server(MockCodaApi::new().with_list_docs(Ok(docs)));

        let result = server
            .coda_list_documents(Parameters(ListDocumentsParams {
                query: Some("test".to_string()),
            }))
            .await
            .expect("tool result");

        assert!(!is_error(&result));
        assert_eq!(
            text_of(&result),
            r#"{"items":[{"id":"123","name":"Test Document"}]}"#
        );
        assert_eq!(
            api.calls(),
            vec![RecordedCall::ListDocs(ListDocsQuery {
                query: Some("test".to_string()),
            })]
        );
    }

    #[tokio::test]
    async fn list_documents_failure_is_an_error_result() {
        let (server, _) = server(MockCodaApi::new().with_list_docs(Err(ApiError::other("foo"))));

        let result = server
            .coda_list_documents(Parameters(ListDocumentsParams::default()))
            .await
            .expect("tool result");

        assert!(is_error(&result));
        assert_eq!(text_of(&result), "Failed to list documents: foo");
    }

    #[tokio::test]
    async fn resolves_empty_url_without_local_validation() {
        let resolved = json!({ "type": "apiLink", "resource": null });
        let (server, api) = server(MockCodaApi::new().with_resolve_link(Ok(resolved)));

        let result = server
            .coda_resolve_link(Parameters(ResolveLinkParams { url: String::new() }))
            .await
            .expect("tool result");

        assert!(!is_error(&result));
        assert_eq!(text_of(&result), r#"{"type":"apiLink","resource":null}"#);
        assert_eq!(
            api.calls(),
            vec![RecordedCall::ResolveLink { url: String::new() }]
        );
    }

    #[tokio::test]
    async fn resolve_failure_is_an_error_result() {
        let (server, _) = server(
            MockCodaApi::new().with_resolve_link(Err(ApiError::Status {
                status: 404,
                message: "Resource not found".to_string(),
            })),
        );

        let result = server
            .coda_resolve_link(Parameters(ResolveLinkParams {
                url: "https://coda.io/d/_dmissing".to_string(),
            }))
            .await
            .expect("tool result");

        assert!(is_error(&result));
        assert_eq!(
            text_of(&result),
            "Failed to resolve link: remote returned 404: Resource not found"
        );
    }
}
