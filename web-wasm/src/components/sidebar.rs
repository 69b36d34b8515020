//! サイドバー（ナビゲーション）

use leptos::prelude::*;

use crate::app::Page;

#[component]
pub fn Sidebar(page: ReadSignal<Page>, set_page: WriteSignal<Page>) -> impl IntoView {
    view! {
        <aside class="sidebar">
            <h1 class="brand">"MedSupport"</h1>
            <nav>
                {Page::NAV
                    .into_iter()
                    .map(|item| {
                        view! {
                            <button
                                class=move || if page.get() == item { "nav-item active" } else { "nav-item" }
                                on:click=move |_| set_page.set(item)
                            >
                                {item.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
        </aside>
    }
}
