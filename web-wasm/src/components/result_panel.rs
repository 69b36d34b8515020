//! 結果表示

use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medsupport_common::{render_markdown, Notifier, TaskSession, Toast, View};
use wasm_bindgen_futures::JsFuture;

use crate::components::spinner::Spinner;
use crate::toast::{use_toaster, Toaster};

/// 結果パネル
///
/// 待機中はプレースホルダー、送信中はスピナー、成功後はMarkdownをHTMLにして表示する。
#[component]
pub fn ResultPanel(
    session: RwSignal<TaskSession>,
    #[prop(into)] title: String,
    #[prop(into)] placeholder: String,
    #[prop(optional)] copyable: bool,
) -> impl IntoView {
    let toaster = use_toaster();
    let markdown = Memo::new(move |_| session.with(|s| s.result().map(|r| r.markdown.clone())));

    let on_copy = move |_| {
        if let Some(text) = markdown.get_untracked() {
            copy_to_clipboard(text, toaster);
        }
    };

    let body = move || {
        let placeholder = placeholder.clone();
        session.with(|s| match s.view() {
            View::Idle => view! { <p class="text-muted">{placeholder}</p> }.into_any(),
            View::Busy => view! { <Spinner label="Analyzing..." /> }.into_any(),
            View::Result(result) => {
                view! { <div class="markdown" inner_html=render_markdown(&result.markdown) /> }.into_any()
            }
        })
    };

    view! {
        <section class="result-panel">
            <div class="result-header">
                <h2>{title}</h2>
                <Show when=move || copyable && markdown.get().is_some()>
                    <button class="btn btn-secondary" on:click=on_copy>"Copy"</button>
                </Show>
            </div>
            {body}
        </section>
    }
}

fn copy_to_clipboard(text: String, toaster: Toaster) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(&text);

    spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => {
                let mut notifier = toaster;
                notifier.notify(Toast::info("Copied to clipboard"));
            }
            Err(e) => error!("clipboard write failed: {:?}", e),
        }
    });
}
