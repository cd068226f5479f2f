// Spin record entity
// Immutable audit entry written once per completed spin

use serde::{Deserialize, Serialize};

use crate::utils::date_of_millis;
use crate::value_objects::{Outcome, SlotVector};

/// Best-effort device position attached by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoAnnotation {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl GeoAnnotation {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Spin record before the history store assigns it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpinRecord {
    pub location: String,
    pub location_name: String,
    pub result: Outcome,
    pub timestamp_ms: i64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_location: Option<GeoAnnotation>,
}

impl NewSpinRecord {
    pub fn new(
        location: impl Into<String>,
        location_name: impl Into<String>,
        result: Outcome,
        timestamp_ms: i64,
        actual_location: Option<GeoAnnotation>,
    ) -> Self {
        Self {
            location: location.into(),
            location_name: location_name.into(),
            result,
            timestamp_ms,
            date: date_of_millis(timestamp_ms),
            actual_location,
        }
    }

    pub fn with_id(self, id: impl Into<String>) -> SpinRecord {
        SpinRecord {
            id: id.into(),
            location: self.location,
            location_name: self.location_name,
            result: self.result,
            timestamp_ms: self.timestamp_ms,
            date: self.date,
            actual_location: self.actual_location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub id: String,
    pub location: String,
    pub location_name: String,
    pub result: Outcome,
    pub timestamp_ms: i64,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_location: Option<GeoAnnotation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpinRequest {
    pub location_id: String,
    #[serde(default)]
    pub actual_location: Option<GeoAnnotation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpinOutcome {
    pub number: Outcome,
    pub location_id: String,
    pub location_name: String,
    pub remaining: SlotVector,
    /// False when the inventory write failed and only the local view advanced.
    pub inventory_persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_derives_partition_date() {
        let outcome = Outcome::new(4).expect("outcome");
        let record = NewSpinRecord::new("location2", "Butembo", outcome, 1_709_337_600_000, None);
        assert_eq!(record.date, "2024-03-02");
        let stored = record.with_id("abc");
        assert_eq!(stored.id, "abc");
        assert_eq!(stored.result.number(), 4);
    }
}
