//! 注目領域を重ねた画像

use leptos::prelude::*;
use medsupport_common::OverlayBox;

/// 画像の上に正規化座標の枠を%指定で重ねる
#[component]
pub fn AnnotatedImage(
    #[prop(into)] src: Signal<String>,
    #[prop(into)] boxes: Signal<Vec<OverlayBox>>,
) -> impl IntoView {
    view! {
        <div class="annotated-image">
            <img src=move || src.get() alt="Uploaded image" />
            {move || {
                boxes
                    .get()
                    .into_iter()
                    .map(|overlay| {
                        let style = overlay.style();
                        view! {
                            <div class="overlay-box" style=style>
                                <span class="overlay-label">{overlay.label}</span>
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
