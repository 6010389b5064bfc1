use std::sync::Arc;

use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::config::AppConfig;
use crate::services::backend::BackendProvider;
use crate::storage::LocalStorage;

/// Toast-style notification published by mutating operations. The display
/// layer subscribes; auto-hide timing is its concern, not ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Everything one dashboard session owns, constructed once and injected.
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<LocalStorage>,
    pub backend: Box<dyn BackendProvider>,
    pub clock: Arc<dyn Clock>,
    notice_tx: broadcast::Sender<Notice>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<LocalStorage>,
        backend: Box<dyn BackendProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (notice_tx, _) = broadcast::channel(64);
        Self {
            config,
            storage,
            backend,
            clock,
            notice_tx,
        }
    }

    /// Broadcast a notice; ignored when nobody is subscribed.
    pub fn notify(&self, notice: Notice) {
        let _ = self.notice_tx.send(notice);
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }
}
