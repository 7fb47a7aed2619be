//! Transient notifications.
//!
//! Mutations report their outcome here. Each toast dismisses itself after
//! `TOAST_DURATION_MS`; at most `MAX_TOASTS` are shown, oldest dropped first.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::config::{MAX_TOASTS, TOAST_DURATION_MS};

stylance::import_crate_style!(css, "src/components/toast.module.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Ordered toast list with bounded length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastQueue {
    items: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    /// Append a toast and return its id.
    pub fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        self.next_id += 1;
        self.items.push(Toast {
            id: self.next_id,
            kind,
            message,
        });
        if self.items.len() > MAX_TOASTS {
            let overflow = self.items.len() - MAX_TOASTS;
            self.items.drain(..overflow);
        }
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

/// Reactive handle to the toast queue.
#[derive(Clone, Copy)]
pub struct Toasts(RwSignal<ToastQueue>);

impl Toasts {
    pub fn new() -> Self {
        Self(RwSignal::new(ToastQueue::default()))
    }

    /// Show a toast that dismisses itself.
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let mut id = 0;
        self.0.update(|q| id = q.push(kind, message.into()));
        let queue = self.0;
        Timeout::new(TOAST_DURATION_MS, move || {
            queue.try_update(|q| q.dismiss(id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.0.update(|q| q.dismiss(id));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let toasts = ctx.toasts;

    view! {
        <div class=css::host role="status" aria-live="polite">
            <For
                each=move || toasts.0.with(|q| q.items().to_vec())
                key=|toast| toast.id
                children=move |toast| {
                    let (class, icon) = match toast.kind {
                        ToastKind::Success => (css::success, ic::SUCCESS),
                        ToastKind::Error => (css::error, ic::WARNING),
                        ToastKind::Info => (css::info, ic::INFO),
                    };
                    let id = toast.id;
                    view! {
                        <div class=format!("{} {}", css::toast, class)>
                            <span class=css::icon><Icon icon=icon /></span>
                            <span class=css::message>{toast.message}</span>
                            <button
                                class=css::close
                                aria-label="Dismiss"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                <Icon icon=ic::CLOSE />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_bounded() {
        let mut queue = ToastQueue::default();
        for i in 0..MAX_TOASTS + 2 {
            queue.push(ToastKind::Info, format!("t{}", i));
        }
        assert_eq!(queue.items().len(), MAX_TOASTS);
        assert_eq!(queue.items()[0].message, "t2");
    }

    #[test]
    fn test_dismiss_by_id() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Success, "saved".into());
        let second = queue.push(ToastKind::Error, "failed".into());
        assert_ne!(first, second);

        queue.dismiss(first);
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].id, second);
        queue.dismiss(first);
        assert_eq!(queue.items().len(), 1);
    }
}
