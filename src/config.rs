use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub mock_booking_count: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "braidz-admin.db".to_string()),
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            search_debounce_ms: env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            mock_booking_count: env::var("MOCK_BOOKING_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}
