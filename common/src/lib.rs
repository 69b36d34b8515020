//! MedSupport Common Library
//!
//! CLIとWeb(WASM)で共有される型と送信状態機械

pub mod api;
pub mod error;
pub mod input;
pub mod markdown;
pub mod notifier;
pub mod overlay;
pub mod request;
pub mod session;
pub mod types;

pub use error::{Error, Result};
pub use input::{check_drop, encode_preview, ImageSource, InputState, PreviewToken, INVALID_DROP_MESSAGE};
pub use markdown::{render_markdown, render_plain};
pub use notifier::{Clock, Notifier, Toast, ToastId, ToastKind, ToastQueue, DEFAULT_DURATION_MS};
pub use overlay::{layout_overlays, BoxPolicy, OverlayBox, FALLBACK_LABEL};
pub use request::{RequestBody, RequestPlan};
pub use session::{RequestToken, ResponseOrdering, Settled, TaskSession, Ticket, View};
pub use types::{AnalysisResponse, BoundingBox, ImageFile, SubmissionResult, Task, TextRequest};
