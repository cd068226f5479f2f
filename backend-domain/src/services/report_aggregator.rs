// Report aggregator
// Stateless folds over spin records. Every output is independent of record
// order: counts are sums and sighting lists are sorted before returning.

use std::collections::BTreeMap;

use crate::entities::{
    DailyReport,
    FilteredReport,
    FrequencyTable,
    GeoSighting,
    Insights,
    LocationBreakdown,
    RangeSummary,
    ReportFilter,
    SpinRecord,
};
use crate::value_objects::{Outcome, COLD_SHARE_PERCENT, HOT_SHARE_PERCENT, SLOT_COUNT};

pub fn empty_frequency_table() -> FrequencyTable {
    Outcome::all().map(|outcome| (outcome.number(), 0)).collect()
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn aggregate(date: &str, records: &[SpinRecord]) -> DailyReport {
    let mut number_frequency = empty_frequency_table();
    let mut location_breakdown: BTreeMap<String, LocationBreakdown> = BTreeMap::new();

    for record in records {
        let number = record.result.number();
        *number_frequency.entry(number).or_insert(0) += 1;

        let entry = location_breakdown
            .entry(record.location.clone())
            .or_insert_with(|| LocationBreakdown {
                name: String::new(),
                spins: empty_frequency_table(),
                total: 0,
                actual_locations: Vec::new(),
                has_real_location: false,
            });
        *entry.spins.entry(number).or_insert(0) += 1;
        entry.total += 1;
        entry.name = pick_name(&entry.name, &record.location_name);
        if let Some(actual) = record.actual_location.as_ref().filter(|geo| geo.has_name()) {
            entry.actual_locations.push(GeoSighting {
                name: actual.name.trim().to_string(),
                accuracy: actual.accuracy,
                timestamp_ms: record.timestamp_ms,
            });
            entry.has_real_location = true;
        }
    }

    for breakdown in location_breakdown.values_mut() {
        breakdown.actual_locations.sort_by(|a, b| {
            a.timestamp_ms
                .cmp(&b.timestamp_ms)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.accuracy.partial_cmp(&b.accuracy).unwrap_or(std::cmp::Ordering::Equal))
        });
    }

    let total_spins = records.len() as u64;
    let percentages = number_frequency
        .iter()
        .map(|(&number, &count)| (number, percentage(count, total_spins)))
        .collect();
    let insights = compute_insights(&number_frequency, total_spins);

    DailyReport {
        date: date.to_string(),
        total_spins,
        number_frequency,
        percentages,
        location_breakdown,
        insights,
    }
}

// Deterministic regardless of arrival order when a location was renamed mid-day.
fn pick_name(current: &str, candidate: &str) -> String {
    let candidate = candidate.trim();
    if current.is_empty() || (!candidate.is_empty() && candidate < current) {
        candidate.to_string()
    } else {
        current.to_string()
    }
}

pub fn compute_insights(frequency: &FrequencyTable, total: u64) -> Insights {
    let average_percentage = 100.0 / SLOT_COUNT as f64;
    if total == 0 {
        return Insights {
            average_percentage,
            ..Insights::default()
        };
    }

    let counts: Vec<(u8, u64)> = Outcome::all()
        .map(|outcome| {
            let number = outcome.number();
            (number, frequency.get(&number).copied().unwrap_or(0))
        })
        .collect();

    let mean = total as f64 / SLOT_COUNT as f64;
    let variance = counts
        .iter()
        .map(|&(_, count)| (count as f64 - mean).powi(2))
        .sum::<f64>()
        / SLOT_COUNT as f64;
    let fairness_score = (1.0 - variance.sqrt() / mean) * 100.0;

    let max = counts.iter().map(|&(_, count)| count).max().unwrap_or(0);
    let min_non_zero = counts
        .iter()
        .map(|&(_, count)| count)
        .filter(|count| *count > 0)
        .min();

    let numbers_where = |predicate: &dyn Fn(u64) -> bool| -> Vec<u8> {
        counts
            .iter()
            .filter(|&&(_, count)| predicate(count))
            .map(|&(number, _)| number)
            .collect()
    };

    let most_frequent = if max > 0 {
        numbers_where(&|count: u64| count == max)
    } else {
        Vec::new()
    };
    let least_frequent = match min_non_zero {
        Some(min) => numbers_where(&|count: u64| count == min),
        None => Vec::new(),
    };
    let hot_numbers = numbers_where(&|count: u64| percentage(count, total) > HOT_SHARE_PERCENT);
    let cold_numbers = numbers_where(&|count: u64| percentage(count, total) < COLD_SHARE_PERCENT);

    Insights {
        fairness_score,
        most_frequent,
        least_frequent,
        hot_numbers,
        cold_numbers,
        average_percentage,
        highest_percentage: percentage(max, total),
        lowest_percentage: min_non_zero.map(|min| percentage(min, total)).unwrap_or(0.0),
    }
}

/// Narrows a report the way the reports screen does. Insights always describe
/// the whole day, not the filtered view.
pub fn apply_filter(report: &DailyReport, filter: &ReportFilter) -> FilteredReport {
    let mut number_frequency = report.number_frequency.clone();
    let mut locations = report.location_breakdown.clone();

    if let Some(number) = filter.number {
        let count = report.number_frequency.get(&number).copied().unwrap_or(0);
        number_frequency = BTreeMap::from([(number, count)]);
        locations = locations
            .into_iter()
            .filter_map(|(id, mut breakdown)| {
                let drawn = breakdown.spins.get(&number).copied().unwrap_or(0);
                if drawn == 0 {
                    return None;
                }
                breakdown.spins = BTreeMap::from([(number, drawn)]);
                breakdown.total = drawn;
                Some((id, breakdown))
            })
            .collect();
    }

    if let Some(location) = filter.location.as_deref() {
        locations.retain(|id, _| id == location);
    }

    if let Some(band) = filter.frequency {
        number_frequency.retain(|_, count| band.contains(percentage(*count, report.total_spins)));
    }

    if let Some(term) = filter.search.as_deref() {
        let needle = term.trim().to_lowercase();
        if !needle.is_empty() {
            locations.retain(|id, breakdown| {
                id.to_lowercase().contains(&needle)
                    || breakdown.name.to_lowercase().contains(&needle)
                    || breakdown
                        .actual_locations
                        .iter()
                        .any(|sighting| sighting.name.to_lowercase().contains(&needle))
            });
        }
    }

    FilteredReport {
        date: report.date.clone(),
        total_spins: report.total_spins,
        number_frequency,
        location_breakdown: locations,
        insights: report.insights.clone(),
        active_filters: filter.active_count(),
    }
}

pub fn summarize_range(records: &[SpinRecord]) -> RangeSummary {
    let mut summary = RangeSummary {
        number_frequency: empty_frequency_table(),
        ..RangeSummary::default()
    };
    for record in records {
        let number = record.result.number();
        summary.total_spins += 1;
        *summary.number_frequency.entry(number).or_insert(0) += 1;
        *summary
            .location_stats
            .entry(record.location.clone())
            .or_insert_with(empty_frequency_table)
            .entry(number)
            .or_insert(0) += 1;
        *summary.daily_breakdown.entry(record.date.clone()).or_insert(0) += 1;
    }
    summary
}
