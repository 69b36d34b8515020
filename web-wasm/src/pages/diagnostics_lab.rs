//! 画像診断ページ

use leptos::prelude::*;
use medsupport_common::{Task, TaskSession};

use crate::api::{backend, submit::submit};
use crate::components::{result_panel::ResultPanel, upload_area::UploadArea};
use crate::toast::use_toaster;

#[component]
pub fn DiagnosticsLab() -> impl IntoView {
    let task = Task::ImageDiagnostics;
    let toaster = use_toaster();
    // 既定のプロンプトが入った状態で始まる
    let session = RwSignal::new(TaskSession::new(task));
    let base_url = backend::base_url();

    let is_loading = move || session.with(|s| s.is_loading());
    let on_submit = move |_| submit(session, toaster, base_url.clone());

    view! {
        <div class="task-page">
            <header class="page-header">
                <h1>{task.title()}</h1>
                <p class="text-muted">{task.description()}</p>
            </header>
            <div class="task-columns">
                <section class="input-panel">
                    <UploadArea session=session hint="X-ray, CT, MRI or dermatology photos" />
                    <label for="diagnostic-prompt">"Prompt"</label>
                    <textarea
                        id="diagnostic-prompt"
                        rows="3"
                        prop:value=move || session.with(|s| s.input().text().to_string())
                        on:input=move |ev| session.update(|s| s.set_text(event_target_value(&ev)))
                    />
                    <button class="btn btn-primary" disabled=is_loading on:click=on_submit>
                        {move || if is_loading() { "Analyzing..." } else { "Analyze Image" }}
                    </button>
                </section>
                <ResultPanel
                    session=session
                    title="Findings"
                    placeholder="Upload an image and run the analysis to see findings."
                />
            </div>
        </div>
    }
}
