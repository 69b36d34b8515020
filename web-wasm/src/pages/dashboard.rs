//! ダッシュボード

use leptos::prelude::*;
use leptos::task::spawn_local;
use medsupport_common::Task;

use crate::api::backend;
use crate::app::Page;

#[component]
pub fn Dashboard(set_page: WriteSignal<Page>) -> impl IntoView {
    let (health, set_health) = signal(None::<Result<String, String>>);

    let base_url = backend::base_url();
    spawn_local({
        let base_url = base_url.clone();
        async move {
            let status = backend::health(&base_url).await.map_err(|e| e.to_string());
            set_health.set(Some(status));
        }
    });

    let health_text = move || match health.get() {
        None => "Checking backend...".to_string(),
        Some(Ok(status)) => format!("Backend: {}", status),
        Some(Err(_)) => "Backend unreachable".to_string(),
    };

    view! {
        <div class="dashboard">
            <header class="page-header">
                <h1>"Medical AI Assistant"</h1>
                <p class="text-muted">"Local multimodal analysis for clinical workflows"</p>
                <p class="health" class:error=move || matches!(health.get(), Some(Err(_)))>
                    {health_text}
                    <span class="text-muted">{format!(" ({})", base_url)}</span>
                </p>
            </header>
            <div class="card-grid">
                {Task::ALL
                    .into_iter()
                    .map(|task| {
                        view! {
                            <button class="feature-card" on:click=move |_| set_page.set(Page::Task(task))>
                                <h2>{task.title()}</h2>
                                <p>{task.description()}</p>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
