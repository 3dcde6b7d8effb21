//! Initial room collection

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::models::{AcUnit, Facilities, Room};

/// Default number of rooms created on first start
pub const DEFAULT_ROOM_COUNT: u32 = 16;

/// Chance that a seeded AC unit is working
const AC_WORKING_PROBABILITY: f64 = 0.85;

/// Room id for the `n`th hall, e.g. `LH-01`
pub fn room_id(n: u32) -> String {
    format!("LH-{:02}", n)
}

/// Build `count` free, clean rooms with two or three AC units each
pub fn seed_rooms<R: Rng>(count: u32, now: DateTime<Utc>, rng: &mut R) -> Vec<Room> {
    (1..=count)
        .map(|n| {
            let units = rng.gen_range(2..=3);
            let facilities = Facilities {
                ac_units: (0..units)
                    .map(|_| AcUnit {
                        working: rng.gen_bool(AC_WORKING_PROBABILITY),
                        ..AcUnit::new()
                    })
                    .collect(),
                ..Facilities::default()
            };
            Room::new(room_id(n), format!("Hall {}", n), facilities, now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoomStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seed_rooms() {
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(7);
        let rooms = seed_rooms(DEFAULT_ROOM_COUNT, now, &mut rng);

        assert_eq!(rooms.len(), 16);
        assert_eq!(rooms[0].id, "LH-01");
        assert_eq!(rooms[15].name, "Hall 16");
        for room in &rooms {
            assert_eq!(room.status(), RoomStatus::Free);
            assert_eq!(room.facilities.chairs_available, 100);
            assert!((2..=3).contains(&room.facilities.ac_units.len()));
            assert!(room.facilities.has_unique_ac_ids());
            assert_eq!(room.cleaning_status.cleaned_by(), "System");
            assert_eq!(room.cleaning_status.employee_id(), "AUTO");
            assert_eq!(room.cleaning_status.cleaned_at(), Some(now));
        }
    }
}
