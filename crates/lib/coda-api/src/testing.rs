//! Scriptable in-memory [`CodaApi`] used by the coda-core and coda-mcp tests.
//!
//! Each endpoint answers from its own queue of scripted replies and every call
//! is recorded in order. An endpoint with an empty queue fails the call.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::CodaApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    BeginExportRequest,
    BeginExportResponse,
    CreatePageRequest,
    ExportStatusResponse,
    ListDocsQuery,
    ListPagesQuery,
    UpdatePageRequest,
};

/// A call observed by [`MockCodaApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ListDocs(ListDocsQuery),
    ListPages {
        doc_id: String,
        query: ListPagesQuery,
    },
    CreatePage {
        doc_id: String,
        request: CreatePageRequest,
    },
    UpdatePage {
        doc_id: String,
        page_id_or_name: String,
        request: UpdatePageRequest,
    },
    BeginExport {
        doc_id: String,
        page_id_or_name: String,
        request: BeginExportRequest,
    },
    ExportStatus {
        doc_id: String,
        page_id_or_name: String,
        request_id: String,
    },
    ResolveLink {
        url: String,
    },
    Download {
        link: String,
    },
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    list_docs: VecDeque<ApiResult<Value>>,
    list_pages: VecDeque<ApiResult<Value>>,
    create_page: VecDeque<ApiResult<Value>>,
    update_page: VecDeque<ApiResult<Value>>,
    begin_export: VecDeque<ApiResult<BeginExportResponse>>,
    export_status: VecDeque<ApiResult<ExportStatusResponse>>,
    resolve_link: VecDeque<ApiResult<Value>>,
    download: VecDeque<ApiResult<String>>,
}

#[derive(Default)]
pub struct MockCodaApi {
    state: Mutex<MockState>,
}

impl MockCodaApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a full successful export: begin, one `complete` status, download.
    #[must_use]
    pub fn with_export(self, request_id: &str, link: &str, markdown: &str) -> Self {
        self.with_begin_export(Ok(BeginExportResponse {
            id: request_id.to_string(),
            status: Some("inProgress".to_string()),
            href: None,
        }))
        .with_export_status(Ok(ExportStatusResponse::complete(link)))
        .with_download(Ok(markdown.to_string()))
    }

    #[must_use]
    pub fn with_list_docs(self, reply: ApiResult<Value>) -> Self {
        self.lock().list_docs.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_list_pages(self, reply: ApiResult<Value>) -> Self {
        self.lock().list_pages.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_create_page(self, reply: ApiResult<Value>) -> Self {
        self.lock().create_page.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_update_page(self, reply: ApiResult<Value>) -> Self {
        self.lock().update_page.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_begin_export(self, reply: ApiResult<BeginExportResponse>) -> Self {
        self.lock().begin_export.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_export_status(self, reply: ApiResult<ExportStatusResponse>) -> Self {
        self.lock().export_status.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_resolve_link(self, reply: ApiResult<Value>) -> Self {
        self.lock().resolve_link.push_back(reply);
        self
    }

    #[must_use]
    pub fn with_download(self, reply: ApiResult<String>) -> Self {
        self.lock().download.push_back(reply);
        self
    }

    /// Returns every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of scripted status replies not yet consumed.
    #[must_use]
    pub fn pending_export_statuses(&self) -> usize {
        self.lock().export_status.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn answer<T>(
        &self,
        call: RecordedCall,
        endpoint: &str,
        queue: impl FnOnce(&mut MockState) -> &mut VecDeque<ApiResult<T>>,
    ) -> ApiResult<T> {
        let mut state = self.lock();
        state.calls.push(call);
        queue(&mut *state)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::other(format!("no scripted reply for {endpoint}"))))
    }
}

#[async_trait]
impl CodaApi for MockCodaApi {
    async fn list_docs(&self, query: ListDocsQuery) -> ApiResult<Value> {
        self.answer(RecordedCall::ListDocs(query), "list_docs", |state| {
            &mut state.list_docs
        })
    }

    async fn list_pages(&self, doc_id: &str, query: ListPagesQuery) -> ApiResult<Value> {
        let call = RecordedCall::ListPages {
            doc_id: doc_id.to_string(),
            query,
        };
        self.answer(call, "list_pages", |state| &mut state.list_pages)
    }

    async fn create_page(&self, doc_id: &str, request: CreatePageRequest) -> ApiResult<Value> {
        let call = RecordedCall::CreatePage {
            doc_id: doc_id.to_string(),
            request,
        };
        self.answer(call, "create_page", |state| &mut state.create_page)
    }

    async fn update_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: UpdatePageRequest,
    ) -> ApiResult<Value> {
        let call = RecordedCall::UpdatePage {
            doc_id: doc_id.to_string(),
            page_id_or_name: page_id_or_name.to_string(),
            request,
        };
        self.answer(call, "update_page", |state| &mut state.update_page)
    }

    async fn begin_page_content_export(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: BeginExportRequest,
    ) -> ApiResult<BeginExportResponse> {
        let call = RecordedCall::BeginExport {
            doc_id: doc_id.to_string(),
            page_id_or_name: page_id_or_name.to_string(),
            request,
        };
        self.answer(call, "begin_page_content_export", |state| {
            &mut state.begin_export
        })
    }

    async fn get_page_content_export_status(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request_id: &str,
    ) -> ApiResult<ExportStatusResponse> {
        let call = RecordedCall::ExportStatus {
            doc_id: doc_id.to_string(),
            page_id_or_name: page_id_or_name.to_string(),
            request_id: request_id.to_string(),
        };
        self.answer(call, "get_page_content_export_status", |state| {
            &mut state.export_status
        })
    }

    async fn resolve_browser_link(&self, url: &str) -> ApiResult<Value> {
        let call = RecordedCall::ResolveLink {
            url: url.to_string(),
        };
        self.answer(call, "resolve_browser_link", |state| &mut state.resolve_link)
    }

    async fn download_text(&self, link: &str) -> ApiResult<String> {
        let call = RecordedCall::Download {
            link: link.to_string(),
        };
        self.answer(call, "download_text", |state| &mut state.download)
    }
}
