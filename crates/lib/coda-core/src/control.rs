use std::sync::Arc;

use coda_api::models::{
    CreatePageRequest,
    ListDocsQuery,
    ListPagesQuery,
    PageContent,
    UpdatePageRequest,
};
use coda_api::{ApiError, CodaApi};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::export::{ExportError, ExportPolicy, fetch_page_markdown};

/// Body used for new pages created without content; the remote rejects an
/// empty canvas.
pub const EMPTY_PAGE_BODY: &str = " ";

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Input payload for creating a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePageInput {
    pub name: String,
    pub content: Option<String>,
    pub parent_page_id: Option<String>,
}

/// Document and page operations over a [`CodaApi`].
pub struct CodaControlPlane<A: CodaApi> {
    api: Arc<A>,
    export_policy: ExportPolicy,
}

impl<A: CodaApi> Clone for CodaControlPlane<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            export_policy: self.export_policy,
        }
    }
}

impl<A: CodaApi> CodaControlPlane<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    #[must_use]
    pub fn from_arc(api: Arc<A>) -> Self {
        Self {
            api,
            export_policy: ExportPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_export_policy(mut self, export_policy: ExportPolicy) -> Self {
        self.export_policy = export_policy;
        self
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[must_use]
    pub const fn export_policy(&self) -> ExportPolicy {
        self.export_policy
    }

    /// Lists or searches documents.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn list_documents(&self, query: Option<String>) -> Result<Value, ControlError> {
        Ok(self.api.list_docs(ListDocsQuery { query }).await?)
    }

    /// Lists pages of a document. A continuation token takes precedence over
    /// `limit`.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn list_pages(
        &self,
        doc_id: &str,
        limit: Option<u32>,
        next_page_token: Option<String>,
    ) -> Result<Value, ControlError> {
        let query = ListPagesQuery::new(limit, next_page_token);
        Ok(self.api.list_pages(doc_id, query).await?)
    }

    /// Creates a page with a markdown body.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn create_page(
        &self,
        doc_id: &str,
        input: CreatePageInput,
    ) -> Result<Value, ControlError> {
        let CreatePageInput {
            name,
            content,
            parent_page_id,
        } = input;
        let request = CreatePageRequest {
            name,
            parent_page_id,
            page_content: PageContent::markdown(
                content.unwrap_or_else(|| EMPTY_PAGE_BODY.to_string()),
            ),
        };
        Ok(self.api.create_page(doc_id, request).await?)
    }

    /// Reads a page as markdown through the export workflow.
    ///
    /// # Errors
    /// Returns `ControlError::Export` if any export phase fails.
    pub async fn get_page_content(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
    ) -> Result<String, ControlError> {
        let markdown =
            fetch_page_markdown(self.api.as_ref(), self.export_policy, doc_id, page_id_or_name)
                .await?;
        Ok(markdown)
    }

    /// Reads the first `num_lines` lines of a page.
    ///
    /// # Errors
    /// Returns `ControlError::Export` if any export phase fails.
    pub async fn peek_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        num_lines: usize,
    ) -> Result<String, ControlError> {
        let content = self.get_page_content(doc_id, page_id_or_name).await?;
        Ok(first_lines(&content, num_lines))
    }

    /// Replaces the whole body of a page.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn replace_page_content(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        content: String,
    ) -> Result<Value, ControlError> {
        let request = UpdatePageRequest::replace_content(content);
        Ok(self.api.update_page(doc_id, page_id_or_name, request).await?)
    }

    /// Appends markdown to the end of a page.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn append_page_content(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        content: String,
    ) -> Result<Value, ControlError> {
        let request = UpdatePageRequest::append_content(content);
        Ok(self.api.update_page(doc_id, page_id_or_name, request).await?)
    }

    /// Copies a page's content into a new top-level page of the same document.
    ///
    /// Nothing is created if the source page cannot be read.
    ///
    /// # Errors
    /// Returns `ControlError` from whichever of the two steps failed.
    pub async fn duplicate_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        new_name: String,
    ) -> Result<Value, ControlError> {
        let content = self.get_page_content(doc_id, page_id_or_name).await?;
        debug!(doc_id, page = page_id_or_name, bytes = content.len(), "duplicating page");
        let request = CreatePageRequest {
            name: new_name,
            parent_page_id: None,
            page_content: PageContent::markdown(content),
        };
        Ok(self.api.create_page(doc_id, request).await?)
    }

    /// Renames a page.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn rename_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        new_name: String,
    ) -> Result<Value, ControlError> {
        let request = UpdatePageRequest::rename(new_name);
        Ok(self.api.update_page(doc_id, page_id_or_name, request).await?)
    }

    /// Resolves a browser link to resource metadata. The URL is passed through
    /// unvalidated.
    ///
    /// # Errors
    /// Returns `ControlError::Api` if the remote call fails.
    pub async fn resolve_link(&self, url: &str) -> Result<Value, ControlError> {
        Ok(self.api.resolve_browser_link(url).await?)
    }
}

/// Splits on `\n` or `\r\n`; a `\r` not followed by `\n` stays in the line.
fn first_lines(content: &str, num_lines: usize) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if let Some((_, terminated)) = lines.split_last_mut() {
        for line in terminated {
            let text: &str = *line;
            *line = text.strip_suffix('\r').unwrap_or(text);
        }
    }
    lines.truncate(num_lines);
    lines.join("\n")
}
