use serde::{Deserialize, Serialize};

/// Content format accepted and produced by the canvas endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentFormat {
    Markdown,
}

/// Update semantics for page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertionMode {
    Replace,
    Append,
}

/// A canvas body expressed in a single content format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasContent {
    pub format: ContentFormat,
    pub content: String,
}

impl CanvasContent {
    #[must_use]
    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            format: ContentFormat::Markdown,
            content: content.into(),
        }
    }
}

/// Initial body of a newly created page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageContent {
    #[serde(rename_all = "camelCase")]
    Canvas { canvas_content: CanvasContent },
}

impl PageContent {
    #[must_use]
    pub fn markdown(content: impl Into<String>) -> Self {
        Self::Canvas {
            canvas_content: CanvasContent::markdown(content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_page_id: Option<String>,
    pub page_content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    pub insertion_mode: InsertionMode,
    pub canvas_content: CanvasContent,
}

/// Body of a page update: a rename, a content change, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_update: Option<ContentUpdate>,
}

impl UpdatePageRequest {
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content_update: None,
        }
    }

    #[must_use]
    pub fn replace_content(content: impl Into<String>) -> Self {
        Self::content(InsertionMode::Replace, content)
    }

    #[must_use]
    pub fn append_content(content: impl Into<String>) -> Self {
        Self::content(InsertionMode::Append, content)
    }

    fn content(insertion_mode: InsertionMode, content: impl Into<String>) -> Self {
        Self {
            name: None,
            content_update: Some(ContentUpdate {
                insertion_mode,
                canvas_content: CanvasContent::markdown(content),
            }),
        }
    }
}

/// Query for listing or searching documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDocsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Pagination for listing pages.
///
/// The remote pagination is token driven: a continuation token already fixes
/// the page size it was issued for, so `new` drops the limit whenever a token
/// is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPagesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl ListPagesQuery {
    #[must_use]
    pub fn new(limit: Option<u32>, page_token: Option<String>) -> Self {
        let page_token = page_token.filter(|token| !token.is_empty());
        let limit = if page_token.is_some() { None } else { limit };
        Self { limit, page_token }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginExportRequest {
    pub output_format: ContentFormat,
}

impl BeginExportRequest {
    #[must_use]
    pub const fn markdown() -> Self {
        Self {
            output_format: ContentFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginExportResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}

/// Lifecycle state of a server-side export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportStatus {
    InProgress,
    Failed,
    Complete,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatusResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub status: ExportStatus,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub download_link: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExportStatusResponse {
    #[must_use]
    pub const fn in_progress() -> Self {
        Self {
            id: None,
            status: ExportStatus::InProgress,
            href: None,
            download_link: None,
            error: None,
        }
    }

    #[must_use]
    pub fn complete(download_link: impl Into<String>) -> Self {
        Self {
            status: ExportStatus::Complete,
            download_link: Some(download_link.into()),
            ..Self::in_progress()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_disables_limit() {
        let query = ListPagesQuery::new(Some(5), Some("token-123".to_string()));
        assert_eq!(query.limit, None);
        assert_eq!(query.page_token.as_deref(), Some("token-123"));
    }

    #[test]
    fn limit_kept_without_token() {
        let query = ListPagesQuery::new(Some(10), None);
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.page_token, None);

        let query = ListPagesQuery::new(Some(10), Some(String::new()));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.page_token, None);
    }

    #[test]
    fn create_page_body_matches_wire_shape() {
        let request = CreatePageRequest {
            name: "New Page".to_string(),
            parent_page_id: None,
            page_content: PageContent::markdown("# Hello World"),
        };
        let value = serde_json::to_value(&request).expect("serialize create request");
        assert_eq!(
            value,
            json!({
                "name": "New Page",
                "pageContent": {
                    "type": "canvas",
                    "canvasContent": { "format": "markdown", "content": "# Hello World" }
                }
            })
        );
    }

    #[test]
    fn content_update_body_matches_wire_shape() {
        let value = serde_json::to_value(UpdatePageRequest::append_content("more"))
            .expect("serialize update request");
        assert_eq!(
            value,
            json!({
                "contentUpdate": {
                    "insertionMode": "append",
                    "canvasContent": { "format": "markdown", "content": "more" }
                }
            })
        );
    }

    #[test]
    fn unknown_export_status_is_tolerated() {
        let status: ExportStatusResponse =
            serde_json::from_value(json!({ "id": "req-1", "status": "queued" }))
                .expect("deserialize status");
        assert_eq!(status.status, ExportStatus::Unknown);
        assert_eq!(status.download_link, None);
    }
}
