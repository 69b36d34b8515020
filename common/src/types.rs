//! 画面・通信で共有される型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Task: 3つのタスクページ（ノート構造化 / レポート平易化 / 画像診断）
//! - ImageFile: 選択された画像
//! - BoundingBox: 正規化座標の注目領域
//! - AnalysisResponse: バックエンドのレスポンス
//! - SubmissionResult: 最新の成功結果

use serde::{Deserialize, Serialize};

use crate::api;

/// タスクページの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Clinical Scribe: 臨床ノートの構造化
    ClinicalNote,
    /// Patient Portal: 患者向けのレポート平易化
    ReportSimplification,
    /// Diagnostics Lab: 画像診断（画像必須）
    ImageDiagnostics,
}

impl Task {
    pub const ALL: [Task; 3] = [
        Task::ClinicalNote,
        Task::ReportSimplification,
        Task::ImageDiagnostics,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Task::ClinicalNote => "scribe",
            Task::ReportSimplification => "patient",
            Task::ImageDiagnostics => "diagnostics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Task::ClinicalNote => "Clinical Scribe",
            Task::ReportSimplification => "Patient Portal",
            Task::ImageDiagnostics => "Diagnostics Lab",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::ClinicalNote => {
                "Automated clinical note generation and entity extraction from raw doctor notes."
            }
            Task::ReportSimplification => {
                "Instantly translate complex medical reports into clear, patient-friendly language."
            }
            Task::ImageDiagnostics => {
                "Multimodal AI analysis for medical imaging and visual anomaly detection."
            }
        }
    }

    /// テキストのみの送信先（画像診断には存在しない）
    pub fn text_endpoint(&self) -> Option<&'static str> {
        match self {
            Task::ClinicalNote => Some(api::ANALYZE_TEXT),
            Task::ReportSimplification => Some(api::SIMPLIFY_REPORT),
            Task::ImageDiagnostics => None,
        }
    }

    /// 画像付き（multipart）の送信先
    pub fn image_endpoint(&self) -> &'static str {
        match self {
            Task::ClinicalNote => api::ANALYZE_NOTE_MULTIMODAL,
            Task::ReportSimplification => api::SIMPLIFY_REPORT_MULTIMODAL,
            Task::ImageDiagnostics => api::ANALYZE_IMAGE,
        }
    }

    pub fn requires_image(&self) -> bool {
        self.text_endpoint().is_none()
    }

    /// 画像診断ではプロンプト欄が初期値つきで常に送られる
    pub fn default_prompt(&self) -> Option<&'static str> {
        match self {
            Task::ImageDiagnostics => {
                Some("Analyze this medical image and identify any abnormalities.")
            }
            _ => None,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Task::ClinicalNote => "Clinical note analyzed successfully!",
            Task::ReportSimplification => "Report simplified successfully!",
            Task::ImageDiagnostics => "Image analyzed successfully!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Task::ClinicalNote => "Failed to analyze note. Please try again.",
            Task::ReportSimplification => "Failed to simplify report.",
            Task::ImageDiagnostics => "Failed to analyze image.",
        }
    }

    pub fn validation_message(&self) -> &'static str {
        match self {
            Task::ClinicalNote => "Please enter a note or upload an image.",
            Task::ReportSimplification => "Please enter text or upload an image.",
            Task::ImageDiagnostics => "Please upload an image to analyze.",
        }
    }

    /// 診断タスクのみ注釈を受け取る
    pub fn has_annotations(&self) -> bool {
        matches!(self, Task::ImageDiagnostics)
    }
}

/// 選択された画像ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    /// 申告されたメディアタイプ（例: "image/png"）。不明なら空文字
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// 申告メディアタイプが image/* か
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// 注目領域（0〜1の正規化座標、左上原点）
///
/// バックエンドからそのまま受け取り、変更しない。範囲外や反転した座標も検証しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireAnnotation", into = "WireAnnotation")]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    pub label: Option<String>,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 通信上の表現 `{box_2d: [xmin, ymin, xmax, ymax], label?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireAnnotation {
    box_2d: [f64; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl From<WireAnnotation> for BoundingBox {
    fn from(wire: WireAnnotation) -> Self {
        let [xmin, ymin, xmax, ymax] = wire.box_2d;
        Self { xmin, ymin, xmax, ymax, label: wire.label }
    }
}

impl From<BoundingBox> for WireAnnotation {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            box_2d: [bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax],
            label: bbox.label,
        }
    }
}

/// テキストのみのリクエストボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// バックエンドのレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub result: String,

    /// 画像診断のみ。欠落・nullは空として扱う
    #[serde(default)]
    pub annotations: Option<Vec<BoundingBox>>,
}

/// 最新の解析結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionResult {
    pub markdown: String,
    pub annotations: Vec<BoundingBox>,
}

impl SubmissionResult {
    /// レスポンスから結果を作る。注釈を持たないタスクでは注釈を捨てる
    pub fn from_response(task: Task, response: AnalysisResponse) -> Self {
        let annotations = if task.has_annotations() {
            response.annotations.unwrap_or_default()
        } else {
            Vec::new()
        };
        Self {
            markdown: response.result,
            annotations,
        }
    }
}
