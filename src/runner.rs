//! CLIからの1タスク実行
//!
//! 入力収集 → 検証 → 送信（スピナー表示）→ 結果反映 → 出力

use crate::cli::OutputFormat;
use crate::client::BackendClient;
use crate::error::{MedSupportError, Result};
use crate::loader;
use indicatif::{ProgressBar, ProgressStyle};
use medsupport_common::{
    encode_preview, layout_overlays, render_markdown, render_plain, BoxPolicy, ImageSource,
    Notifier, OverlayBox, ResponseOrdering, Settled, Task, TaskSession,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// 1タスク分の入力
#[derive(Debug, Clone, Default)]
pub struct TaskInput<'a> {
    pub text: Option<String>,
    pub image: Option<&'a Path>,
}

fn spinner(task: Task) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix(task.title());
    bar.set_message("解析中...");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// タスクを1回実行し、結果を保持したセッションを返す
///
/// 検証で送信しなかった場合は `Rejected`、送信が失敗した場合は `TaskFailed`。
/// どちらも通知は表示済み。
pub async fn run_task(
    client: &BackendClient,
    task: Task,
    input: TaskInput<'_>,
    ordering: ResponseOrdering,
    notifier: &mut dyn Notifier,
    show_spinner: bool,
) -> Result<TaskSession> {
    let mut session = TaskSession::new(task).with_ordering(ordering);

    if let Some(text) = input.text {
        session.set_text(text);
    }

    if let Some(path) = input.image {
        let file = loader::load_image(path)?;
        debug!(file = %file.name, media_type = %file.media_type, bytes = file.bytes.len(), "image loaded");
        let preview = encode_preview(&file);
        // コマンドライン指定はドロップ扱い（image/* 以外は拒否）
        let token = session
            .set_image(file, ImageSource::Dropped, notifier)
            .map_err(|e| MedSupportError::Rejected(e.to_string()))?;
        session.apply_preview(token, preview);
    }

    let ticket = session
        .begin_submit(notifier)
        .map_err(|e| MedSupportError::Rejected(e.to_string()))?;
    debug!(endpoint = ticket.plan.endpoint, multipart = ticket.plan.is_multipart(), "submitting");

    let bar = show_spinner.then(|| spinner(task));
    let outcome = client.execute(&ticket.plan).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let detail = outcome.as_ref().err().map(|e| e.to_string());
    if let Some(detail) = &detail {
        warn!(task = task.slug(), error = %detail, "analysis request failed");
    }

    match session.settle(ticket.token, outcome, notifier) {
        Settled::Succeeded => Ok(session),
        Settled::Failed => Err(MedSupportError::TaskFailed(
            detail.unwrap_or_else(|| task.failure_message().to_string()),
        )),
        Settled::Stale => Err(MedSupportError::TaskFailed("superseded by a newer request".into())),
    }
}

/// 結果を指定形式の文字列にする
pub fn render_output(session: &TaskSession, format: OutputFormat, policy: BoxPolicy) -> String {
    let Some(result) = session.result() else {
        return String::new();
    };
    let overlays = layout_overlays(&result.annotations, policy);

    match format {
        OutputFormat::Markdown => {
            let mut out = result.markdown.clone();
            if !overlays.is_empty() {
                out.push_str("\n\n## Annotations\n\n");
                for overlay in &overlays {
                    out.push_str(&format!("- {}\n", overlay.to_text_row()));
                }
            }
            out
        }
        OutputFormat::Text => {
            let mut out = render_plain(&result.markdown);
            if !overlays.is_empty() {
                out.push_str("\n\nANNOTATIONS\n\n");
                for overlay in &overlays {
                    out.push_str(&format!("• {}\n", overlay.to_text_row()));
                }
            }
            out
        }
        OutputFormat::Html => render_html_document(
            session.task(),
            &render_markdown(&result.markdown),
            session.input().preview_uri(),
            &overlays,
        ),
    }
}

fn render_html_document(
    task: Task,
    body: &str,
    preview_uri: Option<&str>,
    overlays: &[OverlayBox],
) -> String {
    let mut figure = String::new();
    if let Some(uri) = preview_uri {
        figure.push_str("<div class=\"figure\" style=\"position: relative; display: inline-block;\">\n");
        figure.push_str(&format!(
            "<img src=\"{}\" alt=\"analyzed image\" style=\"display: block; max-width: 100%;\">\n",
            escape_html(uri)
        ));
        for overlay in overlays {
            figure.push_str(&format!(
                "<div class=\"overlay\" style=\"position: absolute; border: 2px solid #ef4444; {}\"><span>{}</span></div>\n",
                overlay.style(),
                escape_html(&overlay.label)
            ));
        }
        figure.push_str("</div>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}<article>\n{}</article>\n</body>\n</html>\n",
        task.title(),
        figure,
        body
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
