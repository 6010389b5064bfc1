use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use braidz_admin::clock::SystemClock;
use braidz_admin::config::AppConfig;
use braidz_admin::services::auth::{self, AuthService};
use braidz_admin::services::backend::MockBackend;
use braidz_admin::services::bookings::{BookingList, DateFilter, SortField, SortOrder, StatusFilter};
use braidz_admin::services::calendar::AvailabilityCalendar;
use braidz_admin::services::mock_data;
use braidz_admin::state::AppState;
use braidz_admin::storage::LocalStorage;

/// Headless demo session: everything the dashboard UI would drive, once.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let storage = Arc::new(LocalStorage::open(&config.storage_path)?);
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&storage),
        Box::new(MockBackend::new()),
        Arc::new(SystemClock),
    ));

    let auth_service = AuthService::new(Arc::clone(&storage));
    let (_, user) = auth_service
        .login(auth::ADMIN_EMAIL, auth::ADMIN_PASSWORD)
        .await?;
    tracing::info!(user = %user.email, "session opened");

    let mut bookings = BookingList::new(Arc::clone(&state));
    bookings.load(mock_data::generate_bookings(
        &mut rand::thread_rng(),
        config.mock_booking_count,
        state.clock.today(),
    ));
    let stats = bookings.stats();
    tracing::info!(
        total = stats.total,
        pending = stats.pending,
        confirmed = stats.confirmed,
        cancelled = stats.cancelled,
        "mock bookings seeded"
    );

    bookings.set_status_filter(StatusFilter::Confirmed);
    bookings.set_date_filter(DateFilter::Upcoming);
    bookings.set_sort(SortField::Name, SortOrder::Asc);
    tracing::info!(
        matches = bookings.filtered_len(),
        shown = bookings.visible().len(),
        pages = bookings.total_pages(),
        "sample query: upcoming confirmed bookings by client name"
    );

    let calendar = AvailabilityCalendar::new(Arc::clone(&state));
    tracing::info!(
        month = %calendar.month_label(),
        blocked = calendar.blocked_times().len(),
        "availability calendar ready"
    );

    Ok(())
}
