use serde::Serialize;

/// Parking availability derived from a store's free-text parking notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingStatus {
    Available,
    Paid,
    Unavailable,
    Unknown,
}

// Checked in this order: "주차 불가능" contains "가능", so refusals go first.
const UNAVAILABLE_KEYWORDS: &[&str] = &["불가", "없음", "no parking", "unavailable", "not available"];
const PAID_KEYWORDS: &[&str] = &["유료", "paid"];
const AVAILABLE_KEYWORDS: &[&str] = &["가능", "무료", "free", "available"];

impl ParkingStatus {
    pub fn classify(notes: &str) -> Self {
        let notes = notes.trim().to_lowercase();
        if notes.is_empty() {
            return ParkingStatus::Unknown;
        }

        let mentions = |keywords: &[&str]| keywords.iter().any(|k| notes.contains(k));
        if mentions(UNAVAILABLE_KEYWORDS) {
            ParkingStatus::Unavailable
        } else if mentions(PAID_KEYWORDS) {
            ParkingStatus::Paid
        } else if mentions(AVAILABLE_KEYWORDS) {
            ParkingStatus::Available
        } else {
            ParkingStatus::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParkingStatus::Available => "Parking available",
            ParkingStatus::Paid => "Paid parking",
            ParkingStatus::Unavailable => "No parking",
            ParkingStatus::Unknown => "Parking unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusals_win_over_availability_substrings() {
        assert_eq!(ParkingStatus::classify("주차 불가능"), ParkingStatus::Unavailable);
        assert_eq!(ParkingStatus::classify("No parking available"), ParkingStatus::Unavailable);
        assert_eq!(ParkingStatus::classify("전용 주차장 없음"), ParkingStatus::Unavailable);
    }

    #[test]
    fn paid_wins_over_plain_availability() {
        assert_eq!(ParkingStatus::classify("주차 가능 (유료)"), ParkingStatus::Paid);
        assert_eq!(ParkingStatus::classify("Paid parking available"), ParkingStatus::Paid);
    }

    #[test]
    fn availability_and_unknown() {
        assert_eq!(ParkingStatus::classify("주차 가능"), ParkingStatus::Available);
        assert_eq!(ParkingStatus::classify("2시간 무료"), ParkingStatus::Available);
        assert_eq!(ParkingStatus::classify("   "), ParkingStatus::Unknown);
        assert_eq!(ParkingStatus::classify("건물 지하"), ParkingStatus::Unknown);
    }
}
