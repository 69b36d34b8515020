//! タスクページの送信状態機械
//!
//! Idle → Validating → (Rejected | Submitting) → (Succeeded | Failed) → Idle
//!
//! 通信そのものは呼び出し側（CLIはreqwest、Webはfetch）が行う。
//! `begin_submit` が返す `Ticket` を実行し、結果を `settle` へ渡す。

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{ImageSource, InputState, PreviewToken};
use crate::notifier::{Notifier, Toast};
use crate::request::RequestPlan;
use crate::types::{AnalysisResponse, ImageFile, SubmissionResult, Task};

/// 順序が入れ替わって届いたレスポンスの扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// 最新の送信以外のレスポンスは捨てる
    #[default]
    LatestRequest,
    /// 到着したものを常に反映（最後に届いたものが表示に残る）
    LastSettled,
}

/// 送信ごとに単調増加するトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// 実行待ちの送信
#[derive(Debug, Clone)]
pub struct Ticket {
    pub token: RequestToken,
    pub plan: RequestPlan,
}

/// `settle` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Succeeded,
    Failed,
    /// 新しい送信に追い越されたため破棄
    Stale,
}

/// 結果エリアの表示状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Idle,
    Busy,
    Result(&'a SubmissionResult),
}

/// 1ページ分の状態
#[derive(Debug, Clone)]
pub struct TaskSession {
    task: Task,
    input: InputState,
    result: Option<SubmissionResult>,
    loading: bool,
    ordering: ResponseOrdering,
    latest_token: u64,
}

impl TaskSession {
    pub fn new(task: Task) -> Self {
        let mut input = InputState::new();
        if let Some(prompt) = task.default_prompt() {
            input.set_text(prompt);
        }
        Self {
            task,
            input,
            result: None,
            loading: false,
            ordering: ResponseOrdering::default(),
            latest_token: 0,
        }
    }

    pub fn with_ordering(mut self, ordering: ResponseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Busy
        } else if let Some(result) = &self.result {
            View::Result(result)
        } else {
            View::Idle
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        self.input.set_text(value);
    }

    /// 画像を設定。画像診断では前回の結果と注釈も消す
    pub fn set_image(
        &mut self,
        file: ImageFile,
        source: ImageSource,
        notifier: &mut dyn Notifier,
    ) -> Result<PreviewToken> {
        let token = self.input.set_image(file, source, notifier)?;
        if self.task.has_annotations() {
            self.result = None;
        }
        Ok(token)
    }

    pub fn apply_preview(&mut self, token: PreviewToken, uri: String) -> bool {
        self.input.apply_preview(token, uri)
    }

    /// 画像を削除。画像診断では結果も消す（オーバーレイ対象がなくなるため）
    pub fn clear_image(&mut self) {
        self.input.clear_image();
        if self.task.has_annotations() {
            self.result = None;
        }
    }

    /// 検証して送信を開始する
    ///
    /// 送信不可ならエラー通知を出して `Err(Error::Validation)`（Rejected）。
    /// 送信中でも拒否しない。後から始めた送信が前の送信を追い越す。
    pub fn begin_submit(&mut self, notifier: &mut dyn Notifier) -> Result<Ticket> {
        let plan = match RequestPlan::for_input(self.task, &self.input) {
            Ok(plan) => plan,
            Err(err) => {
                notifier.notify(Toast::error(self.task.validation_message()));
                return Err(err);
            }
        };

        self.latest_token += 1;
        self.result = None;
        self.loading = true;
        Ok(Ticket {
            token: RequestToken(self.latest_token),
            plan,
        })
    }

    /// 通信結果を反映する
    pub fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<AnalysisResponse>,
        notifier: &mut dyn Notifier,
    ) -> Settled {
        let is_current = token.0 == self.latest_token;
        if !is_current && self.ordering == ResponseOrdering::LatestRequest {
            return Settled::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(response) => {
                self.result = Some(SubmissionResult::from_response(self.task, response));
                notifier.notify(Toast::success(self.task.success_message()));
                Settled::Succeeded
            }
            Err(_) => {
                notifier.notify(Toast::error(self.task.failure_message()));
                Settled::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::notifier::{ToastKind, ToastQueue};
    use crate::request::RequestBody;
    use crate::types::BoundingBox;

    fn queue() -> ToastQueue<fn() -> u64> {
        fn zero() -> u64 {
            0
        }
        ToastQueue::new(zero as fn() -> u64)
    }

    fn ok(markdown: &str) -> Result<AnalysisResponse> {
        Ok(AnalysisResponse {
            result: markdown.to_string(),
            annotations: None,
        })
    }

    fn png() -> ImageFile {
        ImageFile::new("ct.png", "image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = TaskSession::new(Task::ClinicalNote);
        assert_eq!(session.view(), View::Idle);
        assert!(!session.is_loading());
        assert_eq!(session.input().text(), "");
    }

    #[test]
    fn test_diagnostics_starts_with_default_prompt() {
        let session = TaskSession::new(Task::ImageDiagnostics);
        assert_eq!(
            session.input().text(),
            "Analyze this medical image and identify any abnormalities."
        );
    }

    #[test]
    fn test_empty_submission_rejected_without_request() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);

        let err = session.begin_submit(&mut notifier).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!session.is_loading());
        assert_eq!(session.view(), View::Idle);

        assert_eq!(notifier.len(), 1);
        let toast = &notifier.active()[0].toast;
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title, "Please enter a note or upload an image.");
    }

    #[test]
    fn test_successful_submission() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ReportSimplification);
        session.set_text("HbA1c 7.2%");

        let ticket = session.begin_submit(&mut notifier).unwrap();
        assert!(session.is_loading());
        assert_eq!(session.view(), View::Busy);
        assert_eq!(ticket.plan.endpoint, "/api/simplify_report");
        assert!(matches!(ticket.plan.body, RequestBody::Json(_)));

        let settled = session.settle(ticket.token, ok("Your **sugar** is high."), &mut notifier);
        assert_eq!(settled, Settled::Succeeded);
        assert!(!session.is_loading());
        match session.view() {
            View::Result(result) => assert_eq!(result.markdown, "Your **sugar** is high."),
            other => panic!("expected result, got {:?}", other),
        }

        let toast = &notifier.active()[0].toast;
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.title, "Report simplified successfully!");
    }

    #[test]
    fn test_failed_submission_clears_loading_and_result() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);
        session.set_text("note");

        let first = session.begin_submit(&mut notifier).unwrap();
        session.settle(first.token, ok("old result"), &mut notifier);
        assert!(session.result().is_some());

        let second = session.begin_submit(&mut notifier).unwrap();
        let settled = session.settle(second.token, Err(Error::Http { status: 500 }), &mut notifier);
        assert_eq!(settled, Settled::Failed);
        assert!(!session.is_loading());
        assert!(session.result().is_none());
        assert_eq!(session.view(), View::Idle);

        let last = &notifier.active().last().unwrap().toast;
        assert_eq!(last.kind, ToastKind::Error);
        assert_eq!(last.title, "Failed to analyze note. Please try again.");
    }

    #[test]
    fn test_new_submission_clears_previous_result_before_resolving() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);
        session.set_text("note");

        let first = session.begin_submit(&mut notifier).unwrap();
        session.settle(first.token, ok("first"), &mut notifier);

        let _second = session.begin_submit(&mut notifier).unwrap();
        assert!(session.result().is_none());
        assert_eq!(session.view(), View::Busy);
    }

    #[test]
    fn test_out_of_order_stale_response_discarded() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);
        session.set_text("note");

        let slow = session.begin_submit(&mut notifier).unwrap();
        let fast = session.begin_submit(&mut notifier).unwrap();

        assert_eq!(session.settle(fast.token, ok("fresh"), &mut notifier), Settled::Succeeded);
        assert_eq!(session.settle(slow.token, ok("stale"), &mut notifier), Settled::Stale);

        assert_eq!(session.result().unwrap().markdown, "fresh");
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_stale_response_keeps_loading_for_latest() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);
        session.set_text("note");

        let slow = session.begin_submit(&mut notifier).unwrap();
        let _fast = session.begin_submit(&mut notifier).unwrap();
        session.settle(slow.token, ok("stale"), &mut notifier);
        assert!(session.is_loading());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_last_settled_ordering_keeps_legacy_race() {
        let mut notifier = queue();
        let mut session =
            TaskSession::new(Task::ClinicalNote).with_ordering(ResponseOrdering::LastSettled);
        session.set_text("note");

        let slow = session.begin_submit(&mut notifier).unwrap();
        let fast = session.begin_submit(&mut notifier).unwrap();

        session.settle(fast.token, ok("fresh"), &mut notifier);
        session.settle(slow.token, ok("stale"), &mut notifier);

        assert_eq!(session.result().unwrap().markdown, "stale");
        assert!(!session.is_loading());
        assert_eq!(notifier.len(), 2);
    }

    #[test]
    fn test_diagnostics_result_carries_annotations() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ImageDiagnostics);
        session.set_image(png(), ImageSource::Picked, &mut notifier).unwrap();

        let ticket = session.begin_submit(&mut notifier).unwrap();
        assert_eq!(ticket.plan.endpoint, "/api/analyze_image");

        let response = AnalysisResponse {
            result: "Nodule seen.".into(),
            annotations: Some(vec![BoundingBox::new(0.1, 0.2, 0.5, 0.6).with_label("Nodule")]),
        };
        session.settle(ticket.token, Ok(response), &mut notifier);
        let result = session.result().unwrap();
        assert_eq!(result.annotations.len(), 1);
        assert_eq!(result.annotations[0].label.as_deref(), Some("Nodule"));
    }

    #[test]
    fn test_diagnostics_new_image_discards_result() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ImageDiagnostics);
        session.set_image(png(), ImageSource::Picked, &mut notifier).unwrap();
        let ticket = session.begin_submit(&mut notifier).unwrap();
        session.settle(ticket.token, ok("findings"), &mut notifier);
        assert!(session.result().is_some());

        session.set_image(png(), ImageSource::Dropped, &mut notifier).unwrap();
        assert!(session.result().is_none());

        let ticket = session.begin_submit(&mut notifier).unwrap();
        session.settle(ticket.token, ok("findings"), &mut notifier);
        session.clear_image();
        assert!(session.result().is_none());
    }

    #[test]
    fn test_text_task_clear_image_keeps_result() {
        let mut notifier = queue();
        let mut session = TaskSession::new(Task::ClinicalNote);
        session.set_image(png(), ImageSource::Picked, &mut notifier).unwrap();
        let ticket = session.begin_submit(&mut notifier).unwrap();
        assert!(ticket.plan.is_multipart());
        session.settle(ticket.token, ok("structured"), &mut notifier);

        session.clear_image();
        assert_eq!(session.result().unwrap().markdown, "structured");
    }
}
