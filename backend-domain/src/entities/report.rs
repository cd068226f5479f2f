// Report entities
// Derived statistics over spin records; never persisted as source of truth

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome number (1..=8) -> occurrences. Every number is present.
pub type FrequencyTable = BTreeMap<u8, u64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoSighting {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationBreakdown {
    pub name: String,
    pub spins: FrequencyTable,
    pub total: u64,
    pub actual_locations: Vec<GeoSighting>,
    pub has_real_location: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Insights {
    pub fairness_score: f64,
    pub most_frequent: Vec<u8>,
    pub least_frequent: Vec<u8>,
    pub hot_numbers: Vec<u8>,
    pub cold_numbers: Vec<u8>,
    pub average_percentage: f64,
    pub highest_percentage: f64,
    pub lowest_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: String,
    pub total_spins: u64,
    pub number_frequency: FrequencyTable,
    pub percentages: BTreeMap<u8, f64>,
    pub location_breakdown: BTreeMap<String, LocationBreakdown>,
    pub insights: Insights,
}

/// A daily report narrowed by the reports screen filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredReport {
    pub date: String,
    pub total_spins: u64,
    pub number_frequency: FrequencyTable,
    pub location_breakdown: BTreeMap<String, LocationBreakdown>,
    pub insights: Insights,
    pub active_filters: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeSummary {
    pub total_spins: u64,
    pub number_frequency: FrequencyTable,
    pub location_stats: BTreeMap<String, FrequencyTable>,
    pub daily_breakdown: BTreeMap<String, u64>,
}
