pub mod blocked_time;
pub mod booking;
pub mod news;
pub mod user;

pub use blocked_time::{BlockKey, BlockSlot, BlockedTime};
pub use booking::{Booking, BookingStats, BookingStatus, Service};
pub use news::NewsPost;
pub use user::AdminUser;
