use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Duration as Days, Months, NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{BlockKey, BlockSlot, BlockedTime};
use crate::state::{AppState, Notice};

/// Storage key for the serialized blocked-time collection.
pub const BLOCKED_TIMES_KEY: &str = "blockedTimes";

/// Six visible weeks.
const GRID_CELLS: i64 = 42;
/// Half-hour slots between 09:00 and 18:00.
const SLOTS_PER_DAY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_blocked: bool,
    /// Strictly before today; not selectable.
    pub is_past: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthNav {
    Prev,
    Next,
}

/// Scratch state for the block-entry dialog. Discarded wholesale on cancel.
#[derive(Debug, Clone, Default)]
pub struct BlockDraft {
    pub is_full_day: bool,
    pub time: Option<NaiveTime>,
    pub reason: String,
}

enum BlockFlow {
    Idle,
    Selecting { date: NaiveDate, draft: BlockDraft },
}

/// Month calendar for blocking out salon availability. Owns the
/// blocked-time collection: loaded from storage once at construction,
/// persisted on every mutation.
pub struct AvailabilityCalendar {
    state: Arc<AppState>,
    /// First day of the displayed month.
    month: NaiveDate,
    blocked: BTreeMap<BlockKey, BlockedTime>,
    flow: BlockFlow,
    pending_delete: Option<String>,
    saving: bool,
}

impl AvailabilityCalendar {
    pub fn new(state: Arc<AppState>) -> Self {
        let today = state.clock.today();
        let month = today.with_day(1).unwrap_or(today);
        let blocked = Self::load_blocked(&state);
        Self {
            state,
            month,
            blocked,
            flow: BlockFlow::Idle,
            pending_delete: None,
            saving: false,
        }
    }

    fn load_blocked(state: &AppState) -> BTreeMap<BlockKey, BlockedTime> {
        let raw = match state.storage.get(BLOCKED_TIMES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "could not read stored blocked times, starting empty");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str::<Vec<BlockedTime>>(&raw) {
            Ok(entries) => entries.into_iter().map(|b| (b.key(), b)).collect(),
            Err(e) => {
                warn!(error = %e, "could not parse stored blocked times, starting empty");
                BTreeMap::new()
            }
        }
    }

    fn persist(&self) -> Result<(), AppError> {
        let entries: Vec<&BlockedTime> = self.blocked.values().collect();
        let raw = serde_json::to_string(&entries)?;
        self.state.storage.set(BLOCKED_TIMES_KEY, &raw)
    }

    // ── Grid ──

    /// The 42-cell grid starting at the Sunday on or before the 1st of the
    /// displayed month.
    pub fn month_grid(&self) -> Vec<CalendarDay> {
        let today = self.state.clock.today();
        let offset = self.month.weekday().num_days_from_sunday() as i64;
        let start = self.month - Days::days(offset);

        (0..GRID_CELLS)
            .map(|i| {
                let date = start + Days::days(i);
                CalendarDay {
                    date,
                    in_month: date.year() == self.month.year()
                        && date.month() == self.month.month(),
                    is_today: date == today,
                    is_blocked: self.is_date_blocked(date),
                    is_past: date < today,
                }
            })
            .collect()
    }

    pub fn navigate(&mut self, nav: MonthNav) {
        let next = match nav {
            MonthNav::Prev => self.month.checked_sub_months(Months::new(1)),
            MonthNav::Next => self.month.checked_add_months(Months::new(1)),
        };
        if let Some(month) = next {
            self.month = month;
        }
    }

    pub fn displayed_month(&self) -> NaiveDate {
        self.month
    }

    pub fn month_label(&self) -> String {
        self.month.format("%B %Y").to_string()
    }

    /// The bookable half-hour slots, 09:00 through 17:30.
    pub fn time_slots() -> Vec<NaiveTime> {
        (0..SLOTS_PER_DAY)
            .filter_map(|i| NaiveTime::from_hms_opt(9 + i / 2, (i % 2) * 30, 0))
            .collect()
    }

    // ── Rendering predicates ──

    /// Any entry for the date, slot-level or full-day.
    pub fn is_date_blocked(&self, date: NaiveDate) -> bool {
        self.blocked.keys().any(|k| k.date == date)
    }

    /// A full-day entry subsumes every slot of its date.
    pub fn is_time_blocked(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.blocked.contains_key(&BlockKey {
            date,
            slot: BlockSlot::FullDay,
        }) || self.blocked.contains_key(&BlockKey {
            date,
            slot: BlockSlot::At(time),
        })
    }

    /// Entries in date order (full-day entries ahead of slots per date).
    pub fn blocked_times(&self) -> Vec<&BlockedTime> {
        self.blocked.values().collect()
    }

    // ── Block-entry flow ──

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), AppError> {
        if date < self.state.clock.today() {
            return Err(AppError::validation("past dates cannot be selected"));
        }
        self.flow = BlockFlow::Selecting {
            date,
            draft: BlockDraft::default(),
        };
        Ok(())
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match &self.flow {
            BlockFlow::Selecting { date, .. } => Some(*date),
            BlockFlow::Idle => None,
        }
    }

    fn draft_mut(&mut self) -> Result<&mut BlockDraft, AppError> {
        match &mut self.flow {
            BlockFlow::Selecting { draft, .. } => Ok(draft),
            BlockFlow::Idle => Err(AppError::validation("no date selected")),
        }
    }

    pub fn set_full_day(&mut self, full_day: bool) -> Result<(), AppError> {
        self.draft_mut()?.is_full_day = full_day;
        Ok(())
    }

    pub fn set_time(&mut self, time: NaiveTime) -> Result<(), AppError> {
        self.draft_mut()?.time = Some(time);
        Ok(())
    }

    pub fn set_reason(&mut self, reason: &str) -> Result<(), AppError> {
        self.draft_mut()?.reason = reason.to_string();
        Ok(())
    }

    /// Discard the scratch state without touching the collection.
    pub fn cancel(&mut self) {
        self.flow = BlockFlow::Idle;
    }

    /// Commit the draft: build the entry, insert it (an existing key is
    /// overwritten), persist, notify. Validation failures leave the flow
    /// open so the dialog can be corrected.
    pub fn block(&mut self) -> Result<BlockedTime, AppError> {
        let (date, draft) = match &self.flow {
            BlockFlow::Selecting { date, draft } => (*date, draft.clone()),
            BlockFlow::Idle => return Err(AppError::validation("no date selected")),
        };

        let slot = if draft.is_full_day {
            BlockSlot::FullDay
        } else {
            let time = draft.time.ok_or_else(|| {
                AppError::validation("a time slot is required unless the whole day is blocked")
            })?;
            if !Self::time_slots().contains(&time) {
                return Err(AppError::validation(
                    "time must be one of the half-hour salon slots",
                ));
            }
            if self.is_time_blocked(date, time) {
                return Err(AppError::validation("that time is already blocked"));
            }
            BlockSlot::At(time)
        };

        let entry = BlockedTime::new(date, slot, &draft.reason);
        info!(id = %entry.id, "blocking time");
        self.blocked.insert(entry.key(), entry.clone());
        self.persist()?;
        self.flow = BlockFlow::Idle;
        self.state.notify(Notice::success("Time blocked successfully"));
        Ok(entry)
    }

    // ── Unblock (explicit confirmation step) ──

    pub fn request_unblock(&mut self, id: &str) -> Result<BlockedTime, AppError> {
        let entry = self
            .blocked
            .values()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("blocked time {id}")))?;
        self.pending_delete = Some(entry.id.clone());
        Ok(entry)
    }

    pub fn confirm_unblock(&mut self) -> Result<(), AppError> {
        let id = self
            .pending_delete
            .take()
            .ok_or_else(|| AppError::validation("no removal pending"))?;
        let key = self
            .blocked
            .values()
            .find(|b| b.id == id)
            .map(|b| b.key())
            .ok_or_else(|| AppError::not_found(format!("blocked time {id}")))?;
        self.blocked.remove(&key);
        self.persist()?;
        info!(id = %id, "blocked time removed");
        self.state.notify(Notice::success("Blocked time removed"));
        Ok(())
    }

    pub fn cancel_unblock(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_unblock(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // ── Save ──

    /// Advisory commit to the backend. The collection is already durable
    /// locally; this simulates the production round-trip.
    pub async fn save(&mut self) -> Result<(), AppError> {
        self.saving = true;
        let entries: Vec<BlockedTime> = self.blocked.values().cloned().collect();
        let result = self.state.backend.save_availability(&entries).await;
        self.saving = false;
        result.map_err(|e| AppError::Backend(e.to_string()))?;
        self.state
            .notify(Notice::success("Availability settings saved successfully!"));
        Ok(())
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::AppConfig;
    use crate::services::backend::MockBackend;
    use crate::storage::LocalStorage;
    use chrono::NaiveDateTime;

    const NOW: &str = "2025-03-10 12:00"; // a Monday

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn test_state() -> Arc<AppState> {
        let config = AppConfig {
            storage_path: ":memory:".to_string(),
            page_size: 8,
            search_debounce_ms: 500,
            mock_booking_count: 50,
        };
        Arc::new(AppState::new(
            config,
            Arc::new(LocalStorage::open(":memory:").unwrap()),
            Box::new(MockBackend::instant()),
            Arc::new(FixedClock(dt(NOW))),
        ))
    }

    fn calendar() -> AvailabilityCalendar {
        AvailabilityCalendar::new(test_state())
    }

    #[test]
    fn grid_has_42_cells_starting_on_sunday() {
        let cal = calendar();
        let grid = cal.month_grid();
        assert_eq!(grid.len(), 42);
        // March 2025 starts on a Saturday; the grid opens on Sunday Feb 23.
        assert_eq!(grid[0].date, date("2025-02-23"));
        assert!(!grid[0].in_month);
        assert!(grid[0].is_past);

        let today = grid.iter().find(|c| c.is_today).unwrap();
        assert_eq!(today.date, date("2025-03-10"));
        assert!(!today.is_past);
    }

    #[test]
    fn navigation_shifts_the_displayed_month() {
        let mut cal = calendar();
        assert_eq!(cal.month_label(), "March 2025");

        cal.navigate(MonthNav::Next);
        assert_eq!(cal.displayed_month(), date("2025-04-01"));

        cal.navigate(MonthNav::Prev);
        cal.navigate(MonthNav::Prev);
        assert_eq!(cal.month_label(), "February 2025");
    }

    #[test]
    fn twenty_half_hour_slots() {
        let slots = AvailabilityCalendar::time_slots();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots[0], time("09:00"));
        assert_eq!(slots[1], time("09:30"));
        assert_eq!(slots[19], time("17:30"));
    }

    #[test]
    fn past_dates_are_not_selectable() {
        let mut cal = calendar();
        let err = cal.select_date(date("2025-03-09"));
        assert!(matches!(err, Err(AppError::Validation(_))));

        // Today itself is selectable.
        cal.select_date(date("2025-03-10")).unwrap();
        assert_eq!(cal.selected_date(), Some(date("2025-03-10")));
    }

    #[test]
    fn full_day_block_marks_the_date() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        cal.set_reason("Holiday").unwrap();
        let entry = cal.block().unwrap();

        assert_eq!(entry.id, "2025-03-15-full-day");
        assert!(cal.is_date_blocked(date("2025-03-15")));
        assert!(cal.is_time_blocked(date("2025-03-15"), time("11:00")));
        assert_eq!(cal.selected_date(), None);
    }

    #[test]
    fn slot_block_requires_a_time() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        let err = cal.block();
        assert!(matches!(err, Err(AppError::Validation(_))));
        // Flow stays open for correction.
        assert_eq!(cal.selected_date(), Some(date("2025-03-15")));

        cal.set_time(time("10:30")).unwrap();
        let entry = cal.block().unwrap();
        assert_eq!(entry.id, "2025-03-15-10:30");
        assert_eq!(entry.reason, "No reason provided");
    }

    #[test]
    fn off_grid_times_are_rejected() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_time(time("08:00")).unwrap();
        assert!(matches!(cal.block(), Err(AppError::Validation(_))));

        cal.set_time(time("10:15")).unwrap();
        assert!(matches!(cal.block(), Err(AppError::Validation(_))));
    }

    #[test]
    fn already_blocked_slot_cannot_be_picked_again() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_time(time("10:00")).unwrap();
        cal.block().unwrap();

        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_time(time("10:00")).unwrap();
        assert!(matches!(cal.block(), Err(AppError::Validation(_))));
        assert_eq!(cal.blocked_times().len(), 1);
    }

    #[test]
    fn full_day_reblock_overwrites_the_entry() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        cal.set_reason("Holiday").unwrap();
        cal.block().unwrap();

        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        cal.set_reason("Deep clean").unwrap();
        cal.block().unwrap();

        let entries = cal.blocked_times();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason, "Deep clean");
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        cal.cancel();

        assert_eq!(cal.selected_date(), None);
        assert!(!cal.is_date_blocked(date("2025-03-15")));
        assert!(matches!(cal.set_full_day(true), Err(AppError::Validation(_))));
    }

    #[test]
    fn unblock_requires_confirmation() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        let entry = cal.block().unwrap();

        let staged = cal.request_unblock(&entry.id).unwrap();
        assert_eq!(staged.id, entry.id);
        assert!(cal.is_date_blocked(date("2025-03-15")));

        cal.confirm_unblock().unwrap();
        assert!(!cal.is_date_blocked(date("2025-03-15")));
    }

    #[test]
    fn cancelled_unblock_keeps_the_entry() {
        let mut cal = calendar();
        cal.select_date(date("2025-03-15")).unwrap();
        cal.set_full_day(true).unwrap();
        let entry = cal.block().unwrap();

        cal.request_unblock(&entry.id).unwrap();
        cal.cancel_unblock();
        assert!(matches!(cal.confirm_unblock(), Err(AppError::Validation(_))));
        assert!(cal.is_date_blocked(date("2025-03-15")));
    }

    #[test]
    fn unknown_unblock_target_is_reported() {
        let mut cal = calendar();
        assert!(matches!(
            cal.request_unblock("2099-01-01-full-day"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn blocks_persist_across_reconstruction() {
        let state = test_state();
        {
            let mut cal = AvailabilityCalendar::new(Arc::clone(&state));
            cal.select_date(date("2025-03-15")).unwrap();
            cal.set_time(time("14:00")).unwrap();
            cal.set_reason("Staff training").unwrap();
            cal.block().unwrap();
        }

        let cal = AvailabilityCalendar::new(state);
        assert!(cal.is_time_blocked(date("2025-03-15"), time("14:00")));
        assert_eq!(cal.blocked_times()[0].reason, "Staff training");
    }

    #[test]
    fn corrupt_stored_blocks_fall_back_to_empty() {
        let state = test_state();
        state.storage.set(BLOCKED_TIMES_KEY, "not json").unwrap();

        let cal = AvailabilityCalendar::new(state);
        assert!(cal.blocked_times().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn save_round_trips_through_the_backend() {
        let state = test_state();
        let mut notices = state.subscribe_notices();

        let mut cal = AvailabilityCalendar::new(Arc::clone(&state));
        cal.save().await.unwrap();
        assert!(!cal.is_saving());

        let notice = notices.try_recv().unwrap();
        assert!(notice.message.contains("saved"));
    }
}
