//! テキスト中心のタスクページ（Clinical Scribe / Patient Portal）

use leptos::prelude::*;
use medsupport_common::{Task, TaskSession};

use crate::api::{backend, submit::submit};
use crate::components::{result_panel::ResultPanel, upload_area::UploadArea};
use crate::toast::use_toaster;

struct PageCopy {
    input_label: &'static str,
    placeholder: &'static str,
    upload_hint: &'static str,
    button: &'static str,
    result_title: &'static str,
    result_placeholder: &'static str,
}

fn copy_for(task: Task) -> PageCopy {
    match task {
        Task::ReportSimplification => PageCopy {
            input_label: "Medical report",
            placeholder: "Paste the medical report here...",
            upload_hint: "Or upload a photo of the report",
            button: "Simplify Report",
            result_title: "Patient-friendly explanation",
            result_placeholder: "The simplified explanation will appear here.",
        },
        _ => PageCopy {
            input_label: "Doctor's notes",
            placeholder: "Enter raw clinical notes here...",
            upload_hint: "Or upload a photo of handwritten notes",
            button: "Analyze Note",
            result_title: "Structured note",
            result_placeholder: "The structured note will appear here.",
        },
    }
}

#[component]
pub fn TextTaskPage(task: Task) -> impl IntoView {
    let toaster = use_toaster();
    let session = RwSignal::new(TaskSession::new(task));
    let copy = copy_for(task);
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
                    <label for="task-input">{copy.input_label}</label>
                    <textarea
                        id="task-input"
                        rows="12"
                        placeholder=copy.placeholder
                        prop:value=move || session.with(|s| s.input().text().to_string())
                        on:input=move |ev| session.update(|s| s.set_text(event_target_value(&ev)))
                    />
                    <UploadArea session=session hint=copy.upload_hint />
                    <button class="btn btn-primary" disabled=is_loading on:click=on_submit>
                        {move || if is_loading() { "Processing..." } else { copy.button }}
                    </button>
                </section>
                <ResultPanel
                    session=session
                    title=copy.result_title
                    placeholder=copy.result_placeholder
                    copyable={task == Task::ClinicalNote}
                />
            </div>
        </div>
    }
}
