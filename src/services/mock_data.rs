use chrono::{Duration, NaiveDate, NaiveTime};
use rand::Rng;

use crate::models::{Booking, BookingStatus, Service};

/// Fixed client roster the generator cycles through.
pub const CLIENTS: [(&str, &str); 40] = [
    ("John Smith", "john.smith@example.com"),
    ("Emma Johnson", "emma.j@example.com"),
    ("Michael Brown", "michael.b@example.com"),
    ("Sarah Davis", "sarah.d@example.com"),
    ("David Wilson", "david.w@example.com"),
    ("Lisa Anderson", "lisa.a@example.com"),
    ("Robert Taylor", "robert.t@example.com"),
    ("Jennifer Martinez", "jennifer.m@example.com"),
    ("William Thomas", "william.t@example.com"),
    ("Patricia Garcia", "patricia.g@example.com"),
    ("James Wilson", "james.w@example.com"),
    ("Elizabeth Moore", "elizabeth.m@example.com"),
    ("Joseph Lee", "joseph.l@example.com"),
    ("Margaret White", "margaret.w@example.com"),
    ("Thomas Harris", "thomas.h@example.com"),
    ("Susan Clark", "susan.c@example.com"),
    ("Charles Lewis", "charles.l@example.com"),
    ("Jessica Hall", "jessica.h@example.com"),
    ("Daniel Young", "daniel.y@example.com"),
    ("Sarah King", "sarah.k@example.com"),
    ("Matthew Wright", "matthew.w@example.com"),
    ("Nancy Scott", "nancy.s@example.com"),
    ("Anthony Green", "anthony.g@example.com"),
    ("Betty Adams", "betty.a@example.com"),
    ("Donald Baker", "donald.b@example.com"),
    ("Dorothy Nelson", "dorothy.n@example.com"),
    ("Paul Carter", "paul.c@example.com"),
    ("Karen Mitchell", "karen.m@example.com"),
    ("Mark Perez", "mark.p@example.com"),
    ("Helen Roberts", "helen.r@example.com"),
    ("Steven Turner", "steven.t@example.com"),
    ("Deborah Phillips", "deborah.p@example.com"),
    ("Andrew Campbell", "andrew.c@example.com"),
    ("Sharon Parker", "sharon.p@example.com"),
    ("Kenneth Evans", "kenneth.e@example.com"),
    ("Michelle Edwards", "michelle.e@example.com"),
    ("Joshua Collins", "joshua.c@example.com"),
    ("Laura Stewart", "laura.s@example.com"),
    ("Kevin Morris", "kevin.m@example.com"),
    ("Sandra Rogers", "sandra.r@example.com"),
];

const STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::Cancelled,
];

/// Synthesize `count` bookings for a demo session: dates uniform in the
/// next 90 days, times on 30-minute boundaries between 09:00 and 17:30,
/// service and status uniform, clients cycled from the fixed roster.
pub fn generate_bookings<R: Rng>(rng: &mut R, count: usize, today: NaiveDate) -> Vec<Booking> {
    (0..count)
        .map(|i| {
            let date = today + Duration::days(rng.gen_range(0..90));
            let hour = rng.gen_range(9..18);
            let minute = if rng.gen_bool(0.5) { 0 } else { 30 };
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

            let (name, email) = CLIENTS[i % CLIENTS.len()];

            Booking {
                id: format!("booking-{}", i + 1),
                date,
                time,
                service: Service::ALL[rng.gen_range(0..Service::ALL.len())],
                user_name: name.to_string(),
                user_email: email.to_string(),
                status: STATUSES[rng.gen_range(0..STATUSES.len())],
                duration: rng.gen_range(1..=3),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        "2025-03-10".parse().unwrap()
    }

    #[test]
    fn generates_requested_count_with_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);
        let bookings = generate_bookings(&mut rng, 50, today());
        assert_eq!(bookings.len(), 50);

        let ids: HashSet<_> = bookings.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn dates_fall_within_the_ninety_day_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for booking in generate_bookings(&mut rng, 200, today()) {
            assert!(booking.date >= today());
            assert!(booking.date < today() + Duration::days(90));
        }
    }

    #[test]
    fn times_sit_on_half_hour_boundaries_within_hours() {
        use chrono::Timelike;

        let mut rng = StdRng::seed_from_u64(7);
        for booking in generate_bookings(&mut rng, 200, today()) {
            assert!((9..18).contains(&booking.time.hour()));
            assert!(booking.time.minute() == 0 || booking.time.minute() == 30);
            assert!((1..=3).contains(&booking.duration));
        }
    }

    #[test]
    fn clients_cycle_through_the_roster() {
        let mut rng = StdRng::seed_from_u64(7);
        let bookings = generate_bookings(&mut rng, 45, today());
        assert_eq!(bookings[0].user_name, bookings[40].user_name);
        assert_eq!(bookings[4].user_email, bookings[44].user_email);
    }
}
