//! 端末向けの通知表示
//!
//! 通知は標準エラーへ即時表示し、表示中の列は `ToastQueue` で管理する。

use medsupport_common::{Notifier, Toast, ToastId, ToastKind, ToastQueue};
use std::time::Instant;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// 起動時刻からの経過ミリ秒を返す時計
type ProcessClock = Box<dyn Fn() -> u64>;

fn process_clock() -> ProcessClock {
    let started = Instant::now();
    Box::new(move || started.elapsed().as_millis() as u64)
}

pub struct ConsoleNotifier {
    queue: ToastQueue<ProcessClock>,
    color: bool,
}

impl ConsoleNotifier {
    pub fn new(color: bool) -> Self {
        Self {
            queue: ToastQueue::new(process_clock()),
            color,
        }
    }

    pub fn active_count(&mut self) -> usize {
        self.queue.expire();
        self.queue.len()
    }

    fn format(&self, toast: &Toast) -> String {
        let (icon, paint): (&str, fn(&str) -> String) = match toast.kind {
            ToastKind::Success => ("✔", green),
            ToastKind::Error => ("✖", red),
            ToastKind::Info => ("ℹ", cyan),
        };
        let head = format!("{} {}", icon, toast.title);
        let mut line = if self.color { paint(&head) } else { head };
        if let Some(description) = &toast.description {
            line.push_str("\n  ");
            line.push_str(description);
        }
        line
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, toast: Toast) -> ToastId {
        self.queue.expire();
        eprintln!("{}", self.format(&toast));
        self.queue.notify(toast)
    }

    fn dismiss(&mut self, id: ToastId) -> bool {
        self.queue.dismiss(id)
    }
}
