//! 通知の表示

use leptos::prelude::*;
use medsupport_common::Notifier;

use crate::toast::use_toaster;

#[component]
pub fn ToastStack() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        <div class="toast-stack">
            <For
                each=move || toaster.active()
                key=|active| active.id.0
                children=move |active| {
                    let id = active.id;
                    let class = format!("toast toast-{}", active.toast.kind.as_str());
                    let description = active.toast.description.clone();
                    view! {
                        <div class=class role="status">
                            <div class="toast-body">
                                <strong>{active.toast.title.clone()}</strong>
                                {description.map(|d| view! { <p>{d}</p> })}
                            </div>
                            <button
                                class="toast-close"
                                aria-label="Dismiss"
                                on:click=move |_| {
                                    let mut toaster = toaster;
                                    toaster.dismiss(id);
                                }
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
