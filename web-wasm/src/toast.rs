//! 通知（トースト）のコンテキスト
//!
//! Appで1つだけ作り、各ページへはコンテキスト経由で`Notifier`として渡す。

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use medsupport_common::notifier::ActiveToast;
use medsupport_common::{Notifier, Toast, ToastId, ToastQueue};

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[derive(Clone, Copy)]
pub struct Toaster {
    queue: RwSignal<ToastQueue<fn() -> u64>>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            queue: RwSignal::new(ToastQueue::new(now_ms as fn() -> u64)),
        }
    }

    /// 表示中の通知（追加順）
    pub fn active(&self) -> Vec<ActiveToast> {
        self.queue.with(|q| q.active().to_vec())
    }
}

impl Notifier for Toaster {
    fn notify(&mut self, toast: Toast) -> ToastId {
        let persistent = toast.is_persistent();
        let duration_ms = toast.duration_ms.clamp(0, u32::MAX as i64) as u32;
        let id = self
            .queue
            .try_update(|q| q.notify(toast))
            .unwrap_or(ToastId(0));

        if !persistent {
            let queue = self.queue;
            Timeout::new(duration_ms, move || {
                queue.update(|q| {
                    q.dismiss(id);
                });
            })
            .forget();
        }
        id
    }

    fn dismiss(&mut self, id: ToastId) -> bool {
        self.queue.try_update(|q| q.dismiss(id)).unwrap_or(false)
    }
}

pub fn provide_toaster() -> Toaster {
    let toaster = Toaster::new();
    provide_context(toaster);
    toaster
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}
