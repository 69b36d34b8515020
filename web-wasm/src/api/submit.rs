//! 送信の開始と結果の反映

use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use medsupport_common::{Settled, TaskSession};

use crate::api::backend;
use crate::toast::Toaster;

/// ページの送信ボタンから呼ぶ
///
/// 検証に失敗したら通知だけ出してリクエストは送らない。
pub fn submit(session: RwSignal<TaskSession>, toaster: Toaster, base_url: String) {
    let mut notifier = toaster;
    let ticket = match session.try_update(|s| s.begin_submit(&mut notifier)) {
        Some(Ok(ticket)) => ticket,
        Some(Err(e)) => {
            warn!("submission rejected: {}", e);
            return;
        }
        None => return,
    };

    let task = ticket.plan.task;
    log!("POST {} ({})", ticket.plan.endpoint, task.slug());

    spawn_local(async move {
        let outcome = backend::execute(&base_url, &ticket.plan).await;
        if let Err(e) = &outcome {
            error!("{} failed: {}", task.slug(), e);
        }

        let mut notifier = toaster;
        match session.try_update(|s| s.settle(ticket.token, outcome, &mut notifier)) {
            Some(Settled::Stale) => log!("discarded stale response for {}", task.slug()),
            Some(_) => {}
            None => warn!("page closed before {} settled", task.slug()),
        }
    });
}
