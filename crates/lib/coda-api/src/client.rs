use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

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

pub const DEFAULT_BASE_URL: &str = "https://coda.io/apis/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations consumed from the remote document API.
///
/// Pass-through endpoints return the raw JSON body so remote fields reach the
/// caller unchanged; the export endpoints are typed because the export
/// workflow inspects them.
#[async_trait]
pub trait CodaApi: Send + Sync + 'static {
    async fn list_docs(&self, query: ListDocsQuery) -> ApiResult<Value>;

    async fn list_pages(&self, doc_id: &str, query: ListPagesQuery) -> ApiResult<Value>;

    async fn create_page(&self, doc_id: &str, request: CreatePageRequest) -> ApiResult<Value>;

    async fn update_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: UpdatePageRequest,
    ) -> ApiResult<Value>;

    async fn begin_page_content_export(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: BeginExportRequest,
    ) -> ApiResult<BeginExportResponse>;

    async fn get_page_content_export_status(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request_id: &str,
    ) -> ApiResult<ExportStatusResponse>;

    async fn resolve_browser_link(&self, url: &str) -> ApiResult<Value>;

    /// Fetches a rendered export from its download link as text. A body that
    /// is not valid UTF-8 is an error.
    async fn download_text(&self, link: &str) -> ApiResult<String>;
}

/// Connection settings for [`HttpCodaClient`].
#[derive(Debug, Clone)]
pub struct CodaClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl CodaClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// `reqwest` implementation of [`CodaApi`] using bearer authentication.
#[derive(Clone)]
pub struct HttpCodaClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpCodaClient {
    /// Builds a client for the configured API root.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidUrl` if the base URL cannot carry path
    /// segments, or `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: CodaClientConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|err| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            message: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: config.base_url,
                message: "url cannot be used as an API root".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "url cannot be used as an API root".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CodaApi for HttpCodaClient {
    async fn list_docs(&self, query: ListDocsQuery) -> ApiResult<Value> {
        let url = self.endpoint(&["docs"])?;
        self.send_json(self.http.get(url).query(&query)).await
    }

    async fn list_pages(&self, doc_id: &str, query: ListPagesQuery) -> ApiResult<Value> {
        let url = self.endpoint(&["docs", doc_id, "pages"])?;
        self.send_json(self.http.get(url).query(&query)).await
    }

    async fn create_page(&self, doc_id: &str, request: CreatePageRequest) -> ApiResult<Value> {
        let url = self.endpoint(&["docs", doc_id, "pages"])?;
        self.send_json(self.http.post(url).json(&request)).await
    }

    async fn update_page(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: UpdatePageRequest,
    ) -> ApiResult<Value> {
        let url = self.endpoint(&["docs", doc_id, "pages", page_id_or_name])?;
        self.send_json(self.http.put(url).json(&request)).await
    }

    async fn begin_page_content_export(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request: BeginExportRequest,
    ) -> ApiResult<BeginExportResponse> {
        let url = self.endpoint(&["docs", doc_id, "pages", page_id_or_name, "export"])?;
        self.send_json(self.http.post(url).json(&request)).await
    }

    async fn get_page_content_export_status(
        &self,
        doc_id: &str,
        page_id_or_name: &str,
        request_id: &str,
    ) -> ApiResult<ExportStatusResponse> {
        let url = self.endpoint(&[
            "docs",
            doc_id,
            "pages",
            page_id_or_name,
            "export",
            request_id,
        ])?;
        self.send_json(self.http.get(url)).await
    }

    async fn resolve_browser_link(&self, url: &str) -> ApiResult<Value> {
        let endpoint = self.endpoint(&["resolveBrowserLink"])?;
        self.send_json(self.http.get(endpoint).query(&[("url", url)])).await
    }

    async fn download_text(&self, link: &str) -> ApiResult<String> {
        let url = Url::parse(link).map_err(|err| ApiError::InvalidUrl {
            url: link.to_string(),
            message: err.to_string(),
        })?;
        debug!(%url, "downloading exported content");
        // Download links are pre-signed; the API credential is not sent.
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        let bytes = response.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}
