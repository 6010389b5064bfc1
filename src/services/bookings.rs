use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Duration as Days, NaiveDate, NaiveTime};
use tokio::time::sleep;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Booking, BookingStats, BookingStatus, Service};
use crate::state::AppState;

/// Simulated lookup latency once a search term settles.
const SEARCH_LATENCY: Duration = Duration::from_millis(300);

const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Confirmed,
    Cancelled,
}

impl StatusFilter {
    fn matches(&self, status: BookingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == BookingStatus::Pending,
            StatusFilter::Confirmed => status == BookingStatus::Confirmed,
            StatusFilter::Cancelled => status == BookingStatus::Cancelled,
        }
    }
}

/// Calendar-relative date predicates, evaluated against the session clock
/// each time the view is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Today,
    /// The Sunday-to-Saturday week containing today.
    ThisWeek,
    ThisMonth,
    /// Strictly after today.
    Upcoming,
}

impl DateFilter {
    fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Today => date == today,
            DateFilter::ThisWeek => {
                let start = today - Days::days(today.weekday().num_days_from_sunday() as i64);
                date >= start && date < start + Days::days(7)
            }
            DateFilter::ThisMonth => {
                date.year() == today.year() && date.month() == today.month()
            }
            DateFilter::Upcoming => date > today,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Name,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Handle for one search keystroke. A newer keystroke supersedes every
/// ticket issued before it (last-write-wins).
#[derive(Debug, Clone, Copy)]
pub struct SearchTicket {
    seq: u64,
}

/// The booking list the dashboard renders: owns the master collection and
/// derives the visible page from the current filter/sort/search state.
/// Mutation only happens through the command methods.
pub struct BookingList {
    state: Arc<AppState>,
    bookings: Vec<Booking>,
    filtered: Vec<Booking>,
    status_filter: StatusFilter,
    date_filter: DateFilter,
    sort_by: SortField,
    sort_order: SortOrder,
    search_input: String,
    active_search: Option<String>,
    search_seq: u64,
    searching: bool,
    page: usize,
    page_size: usize,
    debounce: Duration,
    /// Booking whose action dialog is open.
    selected: Option<String>,
    /// Booking with a status update in flight; the display layer disables
    /// its controls so rapid clicks cannot race the backend call.
    updating: Option<String>,
}

impl BookingList {
    pub fn new(state: Arc<AppState>) -> Self {
        let page_size = state.config.page_size.max(1);
        let debounce = Duration::from_millis(state.config.search_debounce_ms);
        Self {
            state,
            bookings: Vec::new(),
            filtered: Vec::new(),
            status_filter: StatusFilter::All,
            date_filter: DateFilter::All,
            sort_by: SortField::Date,
            sort_order: SortOrder::Desc,
            search_input: String::new(),
            active_search: None,
            search_seq: 0,
            searching: false,
            page: 1,
            page_size,
            debounce,
            selected: None,
            updating: None,
        }
    }

    /// Replace the master collection (initial load from the mock source).
    pub fn load(&mut self, bookings: Vec<Booking>) {
        info!(count = bookings.len(), "loaded bookings");
        self.bookings = bookings;
        self.rebuild_view();
    }

    // ── Filters and sorting ──

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        // While a search is active the status/date filters are bypassed;
        // they take effect again once the search is cleared.
        if self.active_search.is_none() {
            self.rebuild_view();
        }
    }

    pub fn set_date_filter(&mut self, filter: DateFilter) {
        self.date_filter = filter;
        if self.active_search.is_none() {
            self.rebuild_view();
        }
    }

    /// Clicking the active sort field flips direction; a new field starts
    /// ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = match self.sort_order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Asc;
        }
        self.rebuild_view();
    }

    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort_by = field;
        self.sort_order = order;
        self.rebuild_view();
    }

    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.active_search = None;
        self.search_seq += 1;
        self.status_filter = StatusFilter::All;
        self.date_filter = DateFilter::All;
        self.sort_by = SortField::Date;
        self.sort_order = SortOrder::Asc;
        self.rebuild_view();
    }

    // ── Search ──

    /// Record a keystroke. The view does not change until the returned
    /// ticket settles through [`BookingList::settle_search`].
    pub fn input_search(&mut self, term: impl Into<String>) -> SearchTicket {
        self.search_input = term.into();
        self.search_seq += 1;
        SearchTicket {
            seq: self.search_seq,
        }
    }

    /// Wait out the quiet period, then apply the search if no newer
    /// keystroke arrived meanwhile. Returns false for superseded tickets.
    pub async fn settle_search(&mut self, ticket: SearchTicket) -> bool {
        sleep(self.debounce).await;
        if ticket.seq != self.search_seq {
            debug!("search input superseded before the quiet period elapsed");
            return false;
        }

        let term = self.search_input.trim().to_lowercase();
        if term.is_empty() {
            self.active_search = None;
            self.rebuild_view();
            return true;
        }

        self.searching = true;
        sleep(SEARCH_LATENCY).await;
        self.active_search = Some(term);
        self.rebuild_view();
        self.searching = false;
        true
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn active_search(&self) -> Option<&str> {
        self.active_search.as_deref()
    }

    // ── Derived view ──

    /// Recompute the cached filtered view. An active search term matches
    /// against the whole collection and replaces the status/date filters;
    /// sorting applies on either path.
    fn rebuild_view(&mut self) {
        let mut rows: Vec<Booking> = match &self.active_search {
            Some(term) => self
                .bookings
                .iter()
                .filter(|b| Self::matches_term(b, term))
                .cloned()
                .collect(),
            None => {
                let today = self.state.clock.today();
                self.bookings
                    .iter()
                    .filter(|b| self.status_filter.matches(b.status))
                    .filter(|b| self.date_filter.matches(b.date, today))
                    .cloned()
                    .collect()
            }
        };
        self.sort_rows(&mut rows);
        self.filtered = rows;
    }

    fn matches_term(booking: &Booking, term: &str) -> bool {
        booking.user_name.to_lowercase().contains(term)
            || booking.service.as_str().to_lowercase().contains(term)
            || booking.user_email.to_lowercase().contains(term)
            || booking.date.format("%Y-%m-%d").to_string().contains(term)
            || booking.time.format("%H:%M").to_string().contains(term)
            || booking.status.as_str().contains(term)
    }

    fn sort_rows(&self, rows: &mut [Booking]) {
        rows.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Name => a
                    .user_name
                    .to_lowercase()
                    .cmp(&b.user_name.to_lowercase()),
                SortField::Service => a
                    .service
                    .as_str()
                    .to_lowercase()
                    .cmp(&b.service.as_str().to_lowercase()),
            };
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    /// The current page of the filtered view.
    pub fn visible(&self) -> &[Booking] {
        let start = (self.page - 1) * self.page_size;
        if start >= self.filtered.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// The master collection, unfiltered.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn stats(&self) -> BookingStats {
        let mut stats = BookingStats {
            total: self.bookings.len(),
            pending: 0,
            confirmed: 0,
            cancelled: 0,
        };
        for booking in &self.bookings {
            match booking.status {
                BookingStatus::Pending => stats.pending += 1,
                BookingStatus::Confirmed => stats.confirmed += 1,
                BookingStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    // ── Pagination ──

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size)
    }

    /// Page buttons to render: every page when five or fewer, otherwise a
    /// five-wide window that keeps the current page visible and stays
    /// clamped to the valid range.
    pub fn page_numbers(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total <= PAGE_WINDOW {
            (1..=total).collect()
        } else if self.page <= 3 {
            (1..=PAGE_WINDOW).collect()
        } else if self.page >= total - 2 {
            (total - (PAGE_WINDOW - 1)..=total).collect()
        } else {
            (self.page - 2..=self.page + 2).collect()
        }
    }

    // ── Action dialog ──

    pub fn open_actions(&mut self, id: &str) -> Result<(), AppError> {
        if self.get(id).is_none() {
            return Err(AppError::not_found(format!("booking {id}")));
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    pub fn close_actions(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn updating(&self) -> Option<&str> {
        self.updating.as_deref()
    }

    // ── Commands ──

    /// Confirm or cancel a pending booking. The backend acknowledges first
    /// (simulated latency); only then is the update applied to the master
    /// collection and the cached view, and the action dialog closed.
    pub async fn set_status(
        &mut self,
        id: &str,
        new_status: BookingStatus,
    ) -> Result<(), AppError> {
        if !new_status.is_terminal() {
            return Err(AppError::validation(
                "a booking can only move to confirmed or cancelled",
            ));
        }
        let current = self
            .bookings
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.status)
            .ok_or_else(|| AppError::not_found(format!("booking {id}")))?;
        if current.is_terminal() {
            return Err(AppError::validation(format!(
                "booking is already {}",
                current.as_str()
            )));
        }

        self.updating = Some(id.to_string());
        let result = self.state.backend.update_booking_status(id, new_status).await;
        self.updating = None;
        result.map_err(|e| AppError::Backend(e.to_string()))?;

        for booking in self.bookings.iter_mut().filter(|b| b.id == id) {
            booking.status = new_status;
        }
        for booking in self.filtered.iter_mut().filter(|b| b.id == id) {
            booking.status = new_status;
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        info!(booking_id = %id, status = new_status.as_str(), "booking status updated");
        Ok(())
    }

    /// Append a new pending booking (walk-in entry from the dashboard).
    pub fn add_booking(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        service: Service,
        duration: u32,
        user_name: &str,
        user_email: &str,
    ) -> Result<Booking, AppError> {
        if duration == 0 {
            return Err(AppError::validation("duration must be at least one hour"));
        }
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            date,
            time,
            service,
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            status: BookingStatus::Pending,
            duration,
        };
        info!(booking_id = %booking.id, "booking created");
        self.bookings.push(booking.clone());
        self.rebuild_view();
        Ok(booking)
    }
}
