//! アップロードエリアコンポーネント
//!
//! ドロップされたファイルは画像か検証する。ファイル選択ダイアログ側は`accept`任せで検証しない。

use js_sys::Uint8Array;
use leptos::html;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use medsupport_common::{check_drop, layout_overlays, BoxPolicy, ImageFile, ImageSource, PreviewToken, TaskSession};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File, FileReader, HtmlInputElement};

use crate::components::annotated_image::AnnotatedImage;
use crate::toast::{use_toaster, Toaster};

#[component]
pub fn UploadArea(
    session: RwSignal<TaskSession>,
    #[prop(default = BoxPolicy::Passthrough)] policy: BoxPolicy,
    #[prop(into)] hint: String,
) -> impl IntoView {
    let toaster = use_toaster();
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<html::Input>::new();

    let preview = Memo::new(move |_| session.with(|s| s.input().preview_uri().map(str::to_string)));
    let has_image = move || session.with(|s| s.input().image().is_some());
    let file_name = move || {
        session.with(|s| s.input().image().map(|i| i.name.clone()).unwrap_or_default())
    };
    let boxes = Signal::derive(move || {
        session.with(|s| {
            s.result()
                .map(|r| layout_overlays(&r.annotations, policy))
                .unwrap_or_default()
        })
    });

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        let file = ev.data_transfer().and_then(|dt| dt.files()).and_then(|f| f.get(0));
        let meta = file.as_ref().map(|f| (f.name(), f.type_()));

        // 画像以外は読み込まずに拒否
        let mut notifier = toaster;
        if check_drop(meta.as_ref().map(|(n, t)| (n.as_str(), t.as_str())), &mut notifier).is_err() {
            return;
        }
        if let Some(file) = file {
            read_file(file, ImageSource::Dropped, session, toaster);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        if let Some(file) = input.files().and_then(|f| f.get(0)) {
            read_file(file, ImageSource::Picked, session, toaster);
        }
        // 同じファイルを選び直せるように
        input.set_value("");
    };

    let on_clear = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        session.update(|s| s.clear_image());
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                type="file"
                accept="image/*"
                class="hidden"
                node_ref=input_ref
                on:change=on_change
                on:click=|ev| ev.stop_propagation()
            />
            <Show
                when=has_image
                fallback=move || {
                    let hint = hint.clone();
                    view! {
                        <div class="upload-icon">"🩻"</div>
                        <p>"Drag & drop an image, or click to browse"</p>
                        <p class="text-muted">{hint}</p>
                    }
                }
            >
                <Show when=move || preview.get().is_some()>
                    <AnnotatedImage
                        src=Signal::derive(move || preview.get().unwrap_or_default())
                        boxes=boxes
                    />
                </Show>
                <div class="upload-file">
                    <span>{file_name}</span>
                    <button class="btn btn-secondary" on:click=on_clear>"Remove"</button>
                </div>
            </Show>
        </div>
    }
}

/// ファイルを読み込んで入力へ渡し、プレビューのデコードを始める
fn read_file(file: File, source: ImageSource, session: RwSignal<TaskSession>, toaster: Toaster) {
    spawn_local(async move {
        let buffer = match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => buffer,
            Err(e) => {
                error!("failed to read {}: {:?}", file.name(), e);
                return;
            }
        };
        let image = ImageFile::new(file.name(), file.type_(), Uint8Array::new(&buffer).to_vec());

        let mut notifier = toaster;
        if let Some(Ok(token)) = session.try_update(|s| s.set_image(image, source, &mut notifier)) {
            read_preview(&file, token, session);
        }
    });
}

fn read_preview(file: &File, token: PreviewToken, session: RwSignal<TaskSession>) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(e) => {
            error!("FileReader unavailable: {:?}", e);
            return;
        }
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Some(uri) = reader_clone.result().ok().and_then(|r| r.as_string()) {
            // 読み込み中に画像が差し替えられていれば捨てる
            session.try_update(|s| s.apply_preview(token, uri));
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(e) = reader.read_as_data_url(file) {
        error!("failed to decode preview: {:?}", e);
    }
}
