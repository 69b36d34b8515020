//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use medsupport_common::Task;

use crate::components::{sidebar::Sidebar, toast_stack::ToastStack};
use crate::pages::{dashboard::Dashboard, diagnostics_lab::DiagnosticsLab, text_task::TextTaskPage};
use crate::toast::provide_toaster;

/// 表示中のページ
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Dashboard,
    Task(Task),
}

impl Page {
    pub const NAV: [Page; 4] = [
        Page::Dashboard,
        Page::Task(Task::ClinicalNote),
        Page::Task(Task::ReportSimplification),
        Page::Task(Task::ImageDiagnostics),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Task(Task::ClinicalNote) => "Clinical Scribe",
            Page::Task(Task::ReportSimplification) => "Patient Portal",
            Page::Task(Task::ImageDiagnostics) => "Diagnostics",
        }
    }
}

/// メインアプリケーションコンポーネント
///
/// ページを切り替えると、そのページの入力と結果は破棄される。
#[component]
pub fn App() -> impl IntoView {
    provide_toaster();
    let (page, set_page) = signal(Page::Dashboard);

    let content = move || match page.get() {
        Page::Dashboard => view! { <Dashboard set_page=set_page /> }.into_any(),
        Page::Task(Task::ImageDiagnostics) => view! { <DiagnosticsLab /> }.into_any(),
        Page::Task(task) => view! { <TextTaskPage task=task /> }.into_any(),
    };

    view! {
        <div class="layout">
            <Sidebar page=page set_page=set_page />
            <main class="content">{content}</main>
            <ToastStack />
        </div>
    }
}
