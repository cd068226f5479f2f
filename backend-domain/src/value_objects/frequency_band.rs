// Frequency band value object
// Buckets an outcome's share of the day's spins

use serde::{Deserialize, Serialize};

pub const HOT_SHARE_PERCENT: f64 = 15.0;
pub const COLD_SHARE_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyBand {
    High,
    Medium,
    Low,
    Zero,
}

impl FrequencyBand {
    pub fn contains(&self, percentage: f64) -> bool {
        match self {
            FrequencyBand::High => percentage > HOT_SHARE_PERCENT,
            FrequencyBand::Medium => {
                (COLD_SHARE_PERCENT..=HOT_SHARE_PERCENT).contains(&percentage)
            }
            FrequencyBand::Low => percentage > 0.0 && percentage < COLD_SHARE_PERCENT,
            FrequencyBand::Zero => percentage == 0.0,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(FrequencyBand::High),
            "medium" => Some(FrequencyBand::Medium),
            "low" => Some(FrequencyBand::Low),
            "zero" => Some(FrequencyBand::Zero),
            _ => None,
        }
    }
}
