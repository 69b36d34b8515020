//! 送信中インジケーター

use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="spinner-container">
            <div class="spinner" />
            <p class="spinner-text">{label}</p>
        </div>
    }
}
