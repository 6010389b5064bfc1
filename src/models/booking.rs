use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub service: Service,
    pub user_name: String,
    pub user_email: String,
    pub status: BookingStatus,
    /// Appointment length in hours; informational only.
    pub duration: u32,
}

impl Booking {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }

    /// Confirmed and cancelled are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

/// The salon's service menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Service {
    Haircut,
    Coloring,
    Styling,
    Treatment,
    Manicure,
    Pedicure,
    Facial,
    Massage,
}

impl Service {
    pub const ALL: [Service; 8] = [
        Service::Haircut,
        Service::Coloring,
        Service::Styling,
        Service::Treatment,
        Service::Manicure,
        Service::Pedicure,
        Service::Facial,
        Service::Massage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Haircut => "Haircut",
            Service::Coloring => "Coloring",
            Service::Styling => "Styling",
            Service::Treatment => "Treatment",
            Service::Manicure => "Manicure",
            Service::Pedicure => "Pedicure",
            Service::Facial => "Facial",
            Service::Massage => "Massage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}
