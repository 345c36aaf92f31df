//! Room suggestion ranking.
//!
//! Pure scoring over an already-filtered available room set. Scores are
//! integers built from fixed additive terms, so identical inputs always
//! produce identical ordering; ties break by ascending room number.

use rust_decimal::Decimal;

use crate::model::{RoomStatus, RoomSummary, View};

const BASE_SCORE: i32 = 100;
const EXACT_CAPACITY_BONUS: i32 = 20;
const CLOSE_CAPACITY_BONUS: i32 = 10;
const OVERSIZE_PENALTY_PER_GUEST: i32 = 5;
const FLOOR_BONUS_PER_FLOOR: i32 = 2;
const FLOOR_BONUS_CAP: i32 = 10;
const CLEAN_BONUS: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRoom {
    pub room_id: ulid::Ulid,
    pub room_number: String,
    pub room_type: String,
    pub floor: u16,
    pub view: View,
    pub capacity: u8,
    pub nightly_rate: Decimal,
    /// Nightly rate × stay length.
    pub total_price: Decimal,
    pub score: i32,
    /// Which bonuses fired, for display only. Deterministic but cosmetic.
    pub reason: String,
}

fn view_bonus(view: View) -> i32 {
    match view {
        View::Sea => 25,
        View::Pool => 20,
        View::Garden => 15,
        View::Mountain => 12,
        View::City => 8,
        View::None => 0,
    }
}

/// Score one room against the requested guest count.
pub fn score_room(room: &RoomSummary, guests: u8) -> (i32, String) {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<String> = Vec::new();

    let capacity_diff = i32::from(room.capacity) - i32::from(guests);
    if capacity_diff == 0 {
        score += EXACT_CAPACITY_BONUS;
        reasons.push("exact capacity".into());
    } else if capacity_diff == 1 {
        score += CLOSE_CAPACITY_BONUS;
        reasons.push("close capacity fit".into());
    } else if capacity_diff > 2 {
        score -= capacity_diff * OVERSIZE_PENALTY_PER_GUEST;
        reasons.push("larger than needed".into());
    }

    let view = view_bonus(room.view);
    score += view;
    if view >= 20 {
        reasons.push(format!("{} view", room.view.label()));
    }

    score += (i32::from(room.floor) * FLOOR_BONUS_PER_FLOOR).min(FLOOR_BONUS_CAP);

    if room.status == RoomStatus::Clean {
        score += CLEAN_BONUS;
        reasons.push("ready now".into());
    } else {
        reasons.push("needs preparation".into());
    }

    let reason = if reasons.is_empty() {
        "general suggestion".to_string()
    } else {
        reasons.join(" | ")
    };
    (score, reason)
}

/// Rank available rooms: score each, sort by score descending with room
/// number as the ascending tie-break, and keep the top `limit`.
pub fn rank(rooms: &[RoomSummary], guests: u8, nights: i64, limit: usize) -> Vec<RankedRoom> {
    let mut ranked: Vec<RankedRoom> = rooms
        .iter()
        .map(|room| {
            let (score, reason) = score_room(room, guests);
            RankedRoom {
                room_id: room.id,
                room_number: room.number.clone(),
                room_type: room.room_type_name.clone(),
                floor: room.floor,
                view: room.view,
                capacity: room.capacity,
                nightly_rate: room.nightly_rate,
                total_price: room.nightly_rate * Decimal::from(nights),
                score,
                reason,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.room_number.cmp(&b.room_number))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use ulid::Ulid;

    fn room(number: &str, floor: u16, capacity: u8, view: View, status: RoomStatus) -> RoomSummary {
        RoomSummary {
            id: Ulid::new(),
            number: number.into(),
            floor,
            room_type_name: "Standard".into(),
            capacity,
            nightly_rate: dec!(100000),
            status,
            view,
        }
    }

    #[test]
    fn exact_capacity_beats_oversized() {
        let exact = room("101", 1, 2, View::None, RoomStatus::Clean);
        let oversized = room("102", 1, 6, View::None, RoomStatus::Clean);
        let (s_exact, _) = score_room(&exact, 2);
        let (s_over, _) = score_room(&oversized, 2);
        assert!(s_exact > s_over);
        // Baseline 100 + exact 20 + floor 2 + clean 15.
        assert_eq!(s_exact, 137);
        // Baseline 100 − 4×5 + floor 2 + clean 15.
        assert_eq!(s_over, 97);
    }

    #[test]
    fn view_ladder_is_monotonic() {
        let views = [View::Sea, View::Pool, View::Garden, View::Mountain, View::City, View::None];
        let scores: Vec<i32> = views
            .iter()
            .map(|&v| score_room(&room("101", 0, 2, v, RoomStatus::Clean), 2).0)
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] > pair[1], "view bonuses must strictly decrease");
        }
    }

    #[test]
    fn floor_bonus_is_capped() {
        let low = room("101", 1, 2, View::None, RoomStatus::Clean);
        let mid = room("501", 5, 2, View::None, RoomStatus::Clean);
        let high = room("901", 9, 2, View::None, RoomStatus::Clean);
        let (s_low, _) = score_room(&low, 2);
        let (s_mid, _) = score_room(&mid, 2);
        let (s_high, _) = score_room(&high, 2);
        assert!(s_mid > s_low);
        assert_eq!(s_mid, s_high); // capped at +10 from floor 5 up
    }

    #[test]
    fn clean_room_preferred_over_dirty() {
        let clean = room("101", 1, 2, View::City, RoomStatus::Clean);
        let dirty = room("102", 1, 2, View::City, RoomStatus::Dirty);
        let (s_clean, r_clean) = score_room(&clean, 2);
        let (s_dirty, r_dirty) = score_room(&dirty, 2);
        assert_eq!(s_clean - s_dirty, 15);
        assert!(r_clean.contains("ready now"));
        assert!(r_dirty.contains("needs preparation"));
    }

    #[test]
    fn reason_mentions_premium_views_only() {
        let sea = room("101", 1, 2, View::Sea, RoomStatus::Clean);
        let city = room("102", 1, 2, View::City, RoomStatus::Clean);
        assert!(score_room(&sea, 2).1.contains("sea view"));
        assert!(!score_room(&city, 2).1.contains("view"));
    }

    #[test]
    fn ranking_is_deterministic_with_room_number_tiebreak() {
        let rooms = vec![
            room("303", 3, 2, View::Garden, RoomStatus::Clean),
            room("101", 3, 2, View::Garden, RoomStatus::Clean),
            room("202", 3, 2, View::Garden, RoomStatus::Clean),
        ];
        let first = rank(&rooms, 2, 3, 10);
        let second = rank(&rooms, 2, 3, 10);
        assert_eq!(first, second);
        let order: Vec<&str> = first.iter().map(|r| r.room_number.as_str()).collect();
        assert_eq!(order, vec!["101", "202", "303"]);
    }

    #[test]
    fn rank_truncates_to_limit() {
        let rooms: Vec<RoomSummary> = (0..8)
            .map(|i| room(&format!("10{i}"), 1, 2, View::City, RoomStatus::Clean))
            .collect();
        assert_eq!(rank(&rooms, 2, 2, 3).len(), 3);
    }

    #[test]
    fn total_price_covers_stay() {
        let rooms = vec![room("101", 1, 2, View::City, RoomStatus::Clean)];
        let ranked = rank(&rooms, 2, 4, 5);
        assert_eq!(ranked[0].total_price, dec!(400000));
    }
}
