//! ローカル推論バックエンドへのfetch
//!
//! 送信形状は`RequestPlan`が決める。ここではJSON / FormDataへ載せ替えるだけ。

use js_sys::{Array, Uint8Array};
use medsupport_common::api::{endpoint_url, resolve_base_url, HEALTH, FILE_FIELD, PROMPT_FIELD};
use medsupport_common::{AnalysisResponse, Error, ImageFile, RequestBody, RequestPlan, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, RequestMode, Response};

/// ビルド時の`MEDSUPPORT_API_URL`、なければ既定値
pub fn base_url() -> String {
    resolve_base_url(option_env!("MEDSUPPORT_API_URL"), None)
}

fn js_error(value: JsValue) -> Error {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Network(message)
}

fn image_blob(file: &ImageFile) -> Result<Blob> {
    let bytes = Uint8Array::from(file.bytes.as_slice());
    let parts = Array::new();
    parts.push(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&file.media_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)
}

async fn fetch(request: &Request) -> Result<Response> {
    let window = web_sys::window().ok_or_else(|| Error::Network("window is unavailable".into()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    value.dyn_into::<Response>().map_err(js_error)
}

async fn read_text(response: &Response) -> Result<String> {
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(text.as_string().unwrap_or_default())
}

/// 送信計画を実行してレスポンスを返す
///
/// 2xx以外はボディを読まずに`Error::Http`。
/// 2xxでもJSONとして読めなければ`Error::Json`。
pub async fn execute(base_url: &str, plan: &RequestPlan) -> Result<AnalysisResponse> {
    let url = endpoint_url(base_url, plan.endpoint);

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);

    let request = match &plan.body {
        RequestBody::Json(body) => {
            init.set_body(&JsValue::from_str(body));
            let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            request
        }
        RequestBody::Multipart { file, prompt } => {
            let form = FormData::new().map_err(js_error)?;
            form.append_with_blob_and_filename(FILE_FIELD, &image_blob(file)?, &file.name)
                .map_err(js_error)?;
            if let Some(prompt) = prompt {
                form.append_with_str(PROMPT_FIELD, prompt).map_err(js_error)?;
            }
            init.set_body(&form);
            Request::new_with_str_and_init(&url, &init).map_err(js_error)?
        }
    };

    let response = fetch(&request).await?;
    if !response.ok() {
        return Err(Error::Http {
            status: response.status(),
        });
    }

    let body = read_text(&response).await?;
    Ok(serde_json::from_str(&body)?)
}

/// `GET /api/health` のstatus
pub async fn health(base_url: &str) -> Result<String> {
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(&endpoint_url(base_url, HEALTH), &init)
        .map_err(js_error)?;

    let response = fetch(&request).await?;
    if !response.ok() {
        return Err(Error::Http {
            status: response.status(),
        });
    }
    let body: serde_json::Value = serde_json::from_str(&read_text(&response).await?)?;
    Ok(body["status"].as_str().unwrap_or("unknown").to_string())
}
