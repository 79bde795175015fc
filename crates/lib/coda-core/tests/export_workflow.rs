use std::time::Duration;

use coda_api::ApiError;
use coda_api::models::{
    BeginExportRequest,
    BeginExportResponse,
    ExportStatus,
    ExportStatusResponse,
};
use coda_api::testing::{MockCodaApi, RecordedCall};
use coda_core::export::{ExportError, ExportPolicy, fetch_page_markdown};
use tokio::time::Instant;

const LINK: &str = "https://coda.example/export/req-1.md";

fn begun(request_id: &str) -> Result<BeginExportResponse, ApiError> {
    Ok(BeginExportResponse {
        id: request_id.to_string(),
        status: Some("inProgress".to_string()),
        href: None,
    })
}

fn status_checks(api: &MockCodaApi) -> Vec<RecordedCall> {
    api.calls()
        .into_iter()
        .filter(|call| matches!(call, RecordedCall::ExportStatus { .. }))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn exports_after_polling_until_complete() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Ok(ExportStatusResponse::in_progress()))
        .with_export_status(Ok(ExportStatusResponse::in_progress()))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)))
        .with_download(Ok("# Page Title\n\nThis is the content.".to_string()));

    let started = Instant::now();
    let markdown = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect("export should succeed");
    let elapsed = started.elapsed();

    assert_eq!(markdown, "# Page Title\n\nThis is the content.");
    assert!(elapsed >= Duration::from_secs(15), "polls waited {elapsed:?}");
    assert!(elapsed < Duration::from_secs(20), "polls waited {elapsed:?}");

    let status_call = RecordedCall::ExportStatus {
        doc_id: "doc-123".to_string(),
        page_id_or_name: "page-456".to_string(),
        request_id: "req-1".to_string(),
    };
    assert_eq!(
        api.calls(),
        vec![
            RecordedCall::BeginExport {
                doc_id: "doc-123".to_string(),
                page_id_or_name: "page-456".to_string(),
                request: BeginExportRequest::markdown(),
            },
            status_call.clone(),
            status_call.clone(),
            status_call,
            RecordedCall::Download {
                link: LINK.to_string(),
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn never_checks_status_more_than_five_times() {
    let mut api = MockCodaApi::new().with_begin_export(begun("req-1"));
    for _ in 0..6 {
        api = api.with_export_status(Ok(ExportStatusResponse::in_progress()));
    }

    let started = Instant::now();
    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("export should time out");

    assert!(matches!(err, ExportError::TimedOut { attempts: 5 }));
    assert_eq!(
        err.to_string(),
        "page content export did not complete after 5 retries"
    );
    assert_eq!(status_checks(&api).len(), 5);
    assert_eq!(api.pending_export_statuses(), 1);
    assert!(started.elapsed() >= Duration::from_secs(25));
    assert!(
        !api
            .calls()
            .iter()
            .any(|call| matches!(call, RecordedCall::Download { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn waits_the_poll_interval_before_every_check() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)))
        .with_download(Ok(String::new()));

    let started = Instant::now();
    fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect("export should succeed");

    assert!(started.elapsed() >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn honours_a_custom_policy() {
    let policy = ExportPolicy::default()
        .with_poll_interval(Duration::from_secs(1))
        .with_max_attempts(2);
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-9"))
        .with_export_status(Ok(ExportStatusResponse::in_progress()))
        .with_export_status(Ok(ExportStatusResponse::in_progress()))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)));

    let started = Instant::now();
    let err = fetch_page_markdown(&api, policy, "doc-123", "page-456")
        .await
        .expect_err("export should time out");

    assert!(matches!(err, ExportError::TimedOut { attempts: 2 }));
    assert_eq!(status_checks(&api).len(), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn start_failure_is_not_retried() {
    let api = MockCodaApi::new().with_begin_export(Err(ApiError::other("Export failed")));

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("start should fail");

    assert!(matches!(err, ExportError::StartFailed(_)));
    assert_eq!(err.to_string(), "export could not be started: Export failed");
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_without_request_id_fails() {
    let api = MockCodaApi::new().with_begin_export(begun(""));

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("start should fail");

    assert!(matches!(err, ExportError::StartFailed(_)));
    assert!(status_checks(&api).is_empty());
}

#[tokio::test(start_paused = true)]
async fn status_check_failure_is_not_retried() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Err(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)));

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("status check should fail");

    assert!(matches!(err, ExportError::StatusCheckFailed(_)));
    assert_eq!(status_checks(&api).len(), 1);
    assert_eq!(api.pending_export_statuses(), 1);
}

#[tokio::test(start_paused = true)]
async fn remote_failed_status_keeps_polling_until_budget() {
    let mut api = MockCodaApi::new().with_begin_export(begun("req-1"));
    for _ in 0..6 {
        api = api.with_export_status(Ok(ExportStatusResponse {
            status: ExportStatus::Failed,
            error: Some("render crashed".to_string()),
            ..ExportStatusResponse::in_progress()
        }));
    }

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("export should time out");

    assert!(matches!(err, ExportError::TimedOut { attempts: 5 }));
    assert_eq!(status_checks(&api).len(), 5);
    assert_eq!(api.pending_export_statuses(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_status_then_complete_still_downloads() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Ok(ExportStatusResponse {
            status: ExportStatus::Failed,
            ..ExportStatusResponse::in_progress()
        }))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)))
        .with_download(Ok("# Recovered".to_string()));

    let markdown = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect("export should succeed");

    assert_eq!(markdown, "# Recovered");
    assert_eq!(status_checks(&api).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn complete_without_link_fails() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Ok(ExportStatusResponse {
            status: ExportStatus::Complete,
            ..ExportStatusResponse::in_progress()
        }));

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("export should fail");

    assert!(matches!(err, ExportError::StatusCheckFailed(_)));
}

#[tokio::test(start_paused = true)]
async fn download_failure_names_the_link() {
    let api = MockCodaApi::new()
        .with_begin_export(begun("req-1"))
        .with_export_status(Ok(ExportStatusResponse::complete(LINK)))
        .with_download(Err(ApiError::other("connection reset")));

    let err = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect_err("download should fail");

    assert!(matches!(err, ExportError::DownloadFailed { .. }));
    assert!(err.to_string().contains(LINK));
}

#[tokio::test(start_paused = true)]
async fn empty_page_is_valid_content() {
    let api = MockCodaApi::new().with_export("req-1", LINK, "");

    let markdown = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
        .await
        .expect("empty content is not an error");

    assert_eq!(markdown, "");
}

#[tokio::test(start_paused = true)]
async fn repeated_reads_share_no_state() {
    for _ in 0..2 {
        let api = MockCodaApi::new().with_export("req-1", LINK, "# Same");
        let markdown = fetch_page_markdown(&api, ExportPolicy::default(), "doc-123", "page-456")
            .await
            .expect("export should succeed");
        assert_eq!(markdown, "# Same");
        assert_eq!(api.calls().len(), 3);
    }
}
