//! Host-provided UI capabilities: toasts and confirmation dialogs.

use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Info,
    Warning,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotifyKind, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub variant: ConfirmVariant,
}

impl ConfirmOptions {
    pub fn destructive(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            variant: ConfirmVariant::Destructive,
        }
    }
}

pub type ConfirmFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

pub trait Confirmer: Send + Sync {
    fn confirm(&self, options: ConfirmOptions) -> ConfirmFuture<'_>;
}

/// Notifier that only writes to the log, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Error => log::error!("[Notify] {}", message),
            NotifyKind::Warning => log::warn!("[Notify] {}", message),
            NotifyKind::Success | NotifyKind::Info => log::info!("[Notify] {}", message),
        }
    }
}

/// Confirmer that answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmer(pub bool);

impl Confirmer for FixedConfirmer {
    fn confirm(&self, options: ConfirmOptions) -> ConfirmFuture<'_> {
        let answer = self.0;
        Box::pin(async move {
            log::debug!("[Confirm] '{}' answered {}", options.title, answer);
            answer
        })
    }
}
