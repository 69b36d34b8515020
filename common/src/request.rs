//! リクエスト形状の選択
//!
//! 画像あり → multipart（画像 + 任意のテキスト）
//! 画像なし → JSON `{text}`（テキストのみの送信先）

use crate::error::{Error, Result};
use crate::input::InputState;
use crate::types::{ImageFile, Task, TextRequest};

/// 送信内容
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart {
        file: ImageFile,
        /// `prompt` フィールド。空のテキストは送らない
        prompt: Option<String>,
    },
}

/// 1回分の送信計画
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub task: Task,
    pub endpoint: &'static str,
    pub body: RequestBody,
}

impl RequestPlan {
    /// 入力からリクエストを組み立てる
    ///
    /// 送信可能でなければタスクごとの検証メッセージで失敗する。
    pub fn for_input(task: Task, input: &InputState) -> Result<Self> {
        if !input.can_submit_for(task) {
            return Err(Error::Validation(task.validation_message().to_string()));
        }

        if let Some(image) = input.image() {
            let prompt = if input.has_text() {
                Some(input.text().to_string())
            } else {
                task.default_prompt().map(str::to_string)
            };
            return Ok(Self {
                task,
                endpoint: task.image_endpoint(),
                body: RequestBody::Multipart {
                    file: image.clone(),
                    prompt,
                },
            });
        }

        let endpoint = task
            .text_endpoint()
            .ok_or_else(|| Error::Validation(task.validation_message().to_string()))?;
        let body = serde_json::to_string(&TextRequest {
            text: input.text().to_string(),
        })?;
        Ok(Self {
            task,
            endpoint,
            body: RequestBody::Json(body),
        })
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, RequestBody::Multipart { .. })
    }
}
