use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use crate::models::{BlockedTime, BookingStatus};

/// External service the dashboard defers to for mutations that would hit
/// the salon's backend in production.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<()>;

    async fn save_availability(&self, blocked: &[BlockedTime]) -> anyhow::Result<()>;
}

/// Stand-in backend: always succeeds after a fixed artificial delay so the
/// display layer exercises its in-progress states.
pub struct MockBackend {
    status_latency: Duration,
    save_latency: Duration,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            status_latency: Duration::from_millis(500),
            save_latency: Duration::from_millis(1_000),
        }
    }

    /// Zero-latency variant for tests that don't exercise timing.
    pub fn instant() -> Self {
        Self {
            status_latency: Duration::ZERO,
            save_latency: Duration::ZERO,
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendProvider for MockBackend {
    async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> anyhow::Result<()> {
        sleep(self.status_latency).await;
        info!(
            booking_id = %booking_id,
            status = status.as_str(),
            "backend acknowledged status update"
        );
        Ok(())
    }

    async fn save_availability(&self, blocked: &[BlockedTime]) -> anyhow::Result<()> {
        sleep(self.save_latency).await;
        info!(entries = blocked.len(), "backend acknowledged availability save");
        Ok(())
    }
}
