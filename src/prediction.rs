use serde::Serialize;

/// Scores how likely a booking is to be confirmed, 0 to 100.
pub trait ConfirmationEstimator {
    fn estimate(&self, lead_time_days: i64, seat_count: usize) -> u8;
}

/// Placeholder heuristic: earlier and smaller bookings score higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadTimeEstimator {
    pub base: u8,
    pub early_days: i64,
    pub early_bonus: u8,
    pub late_bonus: u8,
    pub small_group: usize,
    pub small_group_bonus: u8,
    pub cap: u8,
}

impl Default for LeadTimeEstimator {
    fn default() -> Self {
        Self {
            base: 85,
            early_days: 7,
            early_bonus: 10,
            late_bonus: 5,
            small_group: 2,
            small_group_bonus: 5,
            cap: 98,
        }
    }
}

impl ConfirmationEstimator for LeadTimeEstimator {
    fn estimate(&self, lead_time_days: i64, seat_count: usize) -> u8 {
        let lead_bonus = if lead_time_days > self.early_days {
            self.early_bonus
        } else {
            self.late_bonus
        };
        let seat_bonus = if seat_count <= self.small_group {
            self.small_group_bonus
        } else {
            0
        };

        self.base
            .saturating_add(lead_bonus)
            .saturating_add(seat_bonus)
            .min(self.cap)
            .min(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceBand {
    High,
    Good,
    Moderate,
}

impl ConfidenceBand {
    pub fn from_probability(probability: u8) -> Self {
        match probability {
            90.. => ConfidenceBand::High,
            75..=89 => ConfidenceBand::Good,
            _ => ConfidenceBand::Moderate,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfidenceBand::High => {
                "High confidence - Your booking is highly likely to be confirmed"
            }
            ConfidenceBand::Good => {
                "Good confidence - Your booking has a strong chance of confirmation"
            }
            ConfidenceBand::Moderate => {
                "Moderate confidence - Your booking may be subject to availability"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_small_bookings_hit_the_cap() {
        let estimator = LeadTimeEstimator::default();
        assert_eq!(estimator.estimate(30, 1), 98);
        assert_eq!(estimator.estimate(8, 2), 98);
    }

    #[test]
    fn late_or_large_bookings_score_lower() {
        let estimator = LeadTimeEstimator::default();
        assert_eq!(estimator.estimate(7, 2), 95);
        assert_eq!(estimator.estimate(0, 4), 90);
        assert_eq!(estimator.estimate(14, 6), 95);
    }

    #[test]
    fn estimators_are_swappable() {
        struct Pessimist;
        impl ConfirmationEstimator for Pessimist {
            fn estimate(&self, _: i64, _: usize) -> u8 {
                40
            }
        }

        let estimators: [&dyn ConfirmationEstimator; 2] =
            [&LeadTimeEstimator::default(), &Pessimist];
        let scores = estimators.map(|estimator| estimator.estimate(10, 1));
        assert_eq!(scores, [98, 40]);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(ConfidenceBand::from_probability(98), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_probability(90), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_probability(89), ConfidenceBand::Good);
        assert_eq!(ConfidenceBand::from_probability(75), ConfidenceBand::Good);
        assert_eq!(ConfidenceBand::from_probability(74), ConfidenceBand::Moderate);
        assert!(ConfidenceBand::Moderate.message().starts_with("Moderate"));
    }
}
