//! 通知（トースト）
//!
//! 各ページへは`Notifier`として注入する。表示中の通知は積み上げ式で、
//! `duration_ms > 0` なら経過後に自動で消え、`<= 0` なら明示的に閉じるまで残る。

use serde::{Deserialize, Serialize};

/// 既定の表示時間（ミリ秒）
pub const DEFAULT_DURATION_MS: i64 = 3000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

/// 通知の内容
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
    pub duration_ms: i64,
}

impl Toast {
    /// `notify(title, kind)` の短縮形
    pub fn new(title: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(title, ToastKind::Info)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(title, ToastKind::Success)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(title, ToastKind::Error)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// 明示的に閉じるまで残るか
    pub fn is_persistent(&self) -> bool {
        self.duration_ms <= 0
    }
}

/// 通知機能（各ページへ注入する）
pub trait Notifier {
    fn notify(&mut self, toast: Toast) -> ToastId;
    /// 指定の通知だけを消す。存在しなければfalse
    fn dismiss(&mut self, id: ToastId) -> bool;
}

/// ミリ秒単位の時計
///
/// WASMでは`std::time::Instant`が使えないため、呼び出し側が時刻を与える。
pub trait Clock {
    fn now_ms(&self) -> u64;
}

impl<F: Fn() -> u64> Clock for F {
    fn now_ms(&self) -> u64 {
        self()
    }
}

/// 表示中の通知
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveToast {
    pub id: ToastId,
    pub toast: Toast,
    pub created_at_ms: u64,
}

impl ActiveToast {
    /// 自動で消える時刻（持続表示ならNone）
    pub fn expires_at_ms(&self) -> Option<u64> {
        if self.toast.is_persistent() {
            None
        } else {
            Some(self.created_at_ms.saturating_add(self.toast.duration_ms as u64))
        }
    }
}

/// 表示中の通知列（追加順）
pub struct ToastQueue<C: Clock> {
    clock: C,
    next_id: u64,
    active: Vec<ActiveToast>,
}

impl<C: Clock> ToastQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn active(&self) -> &[ActiveToast] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn contains(&self, id: ToastId) -> bool {
        self.active.iter().any(|t| t.id == id)
    }

    /// 期限切れの通知を取り除き、消えたIDを返す
    pub fn expire(&mut self) -> Vec<ToastId> {
        let now = self.clock.now_ms();
        let mut expired = Vec::new();
        self.active.retain(|t| match t.expires_at_ms() {
            Some(deadline) if deadline <= now => {
                expired.push(t.id);
                false
            }
            _ => true,
        });
        expired
    }

    /// 次に期限を迎える時刻
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.active.iter().filter_map(ActiveToast::expires_at_ms).min()
    }
}

impl<C: Clock> Notifier for ToastQueue<C> {
    fn notify(&mut self, toast: Toast) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveToast {
            id,
            toast,
            created_at_ms: self.clock.now_ms(),
        });
        id
    }

    fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.id != id);
        self.active.len() != before
    }
}
