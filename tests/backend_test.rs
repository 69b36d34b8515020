//! バックエンド連携テスト
//!
//! プロセス内のaxumモックサーバーに対してCLIのタスク実行を検証

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use medsupport::cli::OutputFormat;
use medsupport::client::BackendClient;
use medsupport::error::MedSupportError;
use medsupport::runner::{self, TaskInput};
use medsupport_common::{BoxPolicy, ResponseOrdering, Task, ToastKind, ToastQueue};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// multipartの内容を1行に要約する
async fn describe_multipart(mut multipart: Multipart) -> String {
    let mut file = String::from("none");
    let mut prompt = String::from("none");
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            "file" => file = format!("{}|{}|{}", file_name, content_type, data.len()),
            "prompt" => prompt = String::from_utf8_lossy(&data).to_string(),
            _ => {}
        }
    }
    format!("file={} prompt={}", file, prompt)
}

fn mock_backend(hits: Arc<AtomicUsize>) -> Router {
    let count = move || {
        hits.fetch_add(1, Ordering::SeqCst);
    };
    let (c1, c2, c3, c4, c5) = (count.clone(), count.clone(), count.clone(), count.clone(), count);

    Router::new()
        .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/api/analyze_text",
            post(move |Json(body): Json<Value>| async move {
                c1();
                Json(json!({"result": format!("## Note\n\n**text:** {}", body["text"].as_str().unwrap_or(""))}))
            }),
        )
        .route(
            "/api/simplify_report",
            post(move |Json(body): Json<Value>| async move {
                c2();
                Json(json!({"result": format!("simple: {}", body["text"].as_str().unwrap_or(""))}))
            }),
        )
        .route(
            "/api/analyze_note_multimodal",
            post(move |multipart: Multipart| async move {
                c3();
                Json(json!({"result": describe_multipart(multipart).await}))
            }),
        )
        .route(
            "/api/simplify_report_multimodal",
            post(move |multipart: Multipart| async move {
                c4();
                Json(json!({"result": describe_multipart(multipart).await}))
            }),
        )
        .route(
            "/api/analyze_image",
            post(move |multipart: Multipart| async move {
                c5();
                Json(json!({
                    "result": describe_multipart(multipart).await,
                    "annotations": [
                        {"box_2d": [0.1, 0.2, 0.5, 0.6], "label": "Nodule"},
                        {"box_2d": [0.5, 0.5, 0.5, 0.5]}
                    ]
                }))
            }),
        )
}

fn failing_backend() -> Router {
    Router::new()
        .route(
            "/api/analyze_text",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
        )
        .route(
            "/api/simplify_report",
            post(|| async { (StatusCode::OK, "this is not json") }),
        )
}

fn client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(10)).unwrap()
}

fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[tokio::test]
async fn test_text_only_note() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits.clone())).await;
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("BP 150/95, HA".into()), image: None };
    let session = runner::run_task(
        &client(&base),
        Task::ClinicalNote,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await
    .expect("解析失敗");

    assert_eq!(session.result().unwrap().markdown, "## Note\n\n**text:** BP 150/95, HA");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert_eq!(notifier.len(), 1);
    let toast = &notifier.active()[0].toast;
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.title, "Clinical note analyzed successfully!");

    let html = runner::render_output(&session, OutputFormat::Html, BoxPolicy::Passthrough);
    assert!(html.contains("<strong>text:</strong>"));
    assert!(!html.contains("**"));
}

#[tokio::test]
async fn test_note_with_image_sends_multipart_and_prompt() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits)).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_file(&dir, "chart.png", PNG_BYTES);
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("handwritten SOAP note".into()), image: Some(&image) };
    let session = runner::run_task(
        &client(&base),
        Task::ClinicalNote,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await
    .unwrap();

    assert_eq!(
        session.result().unwrap().markdown,
        format!("file=chart.png|image/png|{} prompt=handwritten SOAP note", PNG_BYTES.len())
    );
}

#[tokio::test]
async fn test_report_image_without_text_omits_prompt() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits)).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_file(&dir, "labs.png", PNG_BYTES);
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("   ".into()), image: Some(&image) };
    let session = runner::run_task(
        &client(&base),
        Task::ReportSimplification,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await
    .unwrap();

    assert!(session.result().unwrap().markdown.ends_with("prompt=none"));
    assert_eq!(notifier.active()[0].toast.title, "Report simplified successfully!");
}

#[tokio::test]
async fn test_diagnostics_annotations() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits)).await;
    let dir = tempfile::tempdir().unwrap();
    let image = write_file(&dir, "ct.png", PNG_BYTES);
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: None, image: Some(&image) };
    let session = runner::run_task(
        &client(&base),
        Task::ImageDiagnostics,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await
    .unwrap();

    let result = session.result().unwrap();
    assert!(result
        .markdown
        .ends_with("prompt=Analyze this medical image and identify any abnormalities."));
    assert_eq!(result.annotations.len(), 2);

    let text = runner::render_output(&session, OutputFormat::Markdown, BoxPolicy::Passthrough);
    assert!(text.contains("- Nodule: left=10.0% top=20.0% width=40.0% height=40.0%"));
    assert!(text.contains("- Abnormality: left=50.0% top=50.0% width=0.0% height=0.0%"));

    let html = runner::render_output(&session, OutputFormat::Html, BoxPolicy::Passthrough);
    assert!(html.contains("<img src=\"data:image/png;base64,"));
    assert!(html.contains("<span>Nodule</span>"));
    assert!(html.contains("<span>Abnormality</span>"));
}

#[tokio::test]
async fn test_empty_input_rejected_without_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits.clone())).await;
    let mut notifier = ToastQueue::new(|| 0u64);

    let result = runner::run_task(
        &client(&base),
        Task::ReportSimplification,
        TaskInput::default(),
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await;

    assert!(matches!(result, Err(MedSupportError::Rejected(_))));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.len(), 1);
    assert_eq!(notifier.active()[0].toast.title, "Please enter text or upload an image.");
}

#[tokio::test]
async fn test_non_image_file_rejected_once() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits.clone())).await;
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_file(&dir, "report.pdf", b"%PDF-1.7\n");
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("please explain".into()), image: Some(&pdf) };
    let result = runner::run_task(
        &client(&base),
        Task::ReportSimplification,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await;

    assert!(matches!(result, Err(MedSupportError::Rejected(_))));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.len(), 1);
    let toast = &notifier.active()[0].toast;
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.title, "Please drop a valid image file.");
}

#[tokio::test]
async fn test_server_error_is_failure() {
    let base = spawn(failing_backend()).await;
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("note".into()), image: None };
    let result = runner::run_task(
        &client(&base),
        Task::ClinicalNote,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await;

    match result {
        Err(MedSupportError::TaskFailed(detail)) => assert!(detail.contains("500")),
        other => panic!("expected TaskFailed, got {:?}", other.map(|_| ())),
    }
    assert_eq!(notifier.len(), 1);
    assert_eq!(notifier.active()[0].toast.title, "Failed to analyze note. Please try again.");
}

#[tokio::test]
async fn test_malformed_success_body_is_failure() {
    let base = spawn(failing_backend()).await;
    let mut notifier = ToastQueue::new(|| 0u64);

    let input = TaskInput { text: Some("report".into()), image: None };
    let result = runner::run_task(
        &client(&base),
        Task::ReportSimplification,
        input,
        ResponseOrdering::LatestRequest,
        &mut notifier,
        false,
    )
    .await;

    assert!(matches!(result, Err(MedSupportError::TaskFailed(_))));
    assert_eq!(notifier.active()[0].toast.title, "Failed to simplify report.");
}

#[tokio::test]
async fn test_health() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn(mock_backend(hits)).await;
    let health = client(&base).health().await.unwrap();
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_health_unreachable() {
    let base = spawn(failing_backend()).await;
    let err = client(&base).health().await.unwrap_err();
    assert!(matches!(err, MedSupportError::Unreachable(_)));
}
