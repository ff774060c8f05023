//! Cycle-length statistics shared by the phase calculation, the next-period
//! prediction and the `/cycle-stats` endpoint.

use crate::models::{Confidence, CycleStat, CycleStats, PeriodCycle, Regularity};

/// Shortest cycle length considered physiologically plausible.
pub const MIN_CYCLE_LENGTH: i32 = 21;
/// Longest cycle length considered physiologically plausible.
pub const MAX_CYCLE_LENGTH: i32 = 35;
/// Used whenever no plausible cycle length has been recorded.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// How many of the most recent plausible cycles feed the average.
pub const SAMPLE_WINDOW: usize = 6;

const HIGH_CONFIDENCE_MAX_STD_DEV: f64 = 4.0;
const MEDIUM_CONFIDENCE_MAX_STD_DEV: f64 = 7.0;

/// Average cycle length plus the samples it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleLengthSummary {
    pub average: u32,
    pub samples: Vec<i32>,
}

impl CycleLengthSummary {
    /// Population standard deviation of the samples, `None` without samples.
    pub fn std_dev(&self) -> Option<f64> {
        let values: Vec<f64> = self.samples.iter().map(|&v| f64::from(v)).collect();
        population_std_dev(&values)
    }

    pub fn confidence(&self) -> Confidence {
        match self.std_dev() {
            Some(sigma) => confidence_for_std_dev(sigma),
            None => Confidence::Low,
        }
    }
}

/// Records newest first; ties broken by creation time so the order is stable.
pub fn sorted_by_recency(history: &[PeriodCycle]) -> Vec<&PeriodCycle> {
    let mut sorted: Vec<&PeriodCycle> = history.iter().collect();
    sorted.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

pub fn is_plausible_cycle_length(length: i32) -> bool {
    (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&length)
}

pub fn average_cycle_length(history: &[PeriodCycle]) -> CycleLengthSummary {
    let samples: Vec<i32> = sorted_by_recency(history)
        .into_iter()
        .filter_map(|c| c.cycle_length)
        .filter(|&len| is_plausible_cycle_length(len))
        .take(SAMPLE_WINDOW)
        .collect();

    let average = if samples.is_empty() {
        DEFAULT_CYCLE_LENGTH
    } else {
        let total: i64 = samples.iter().map(|&v| i64::from(v)).sum();
        (total as f64 / samples.len() as f64).round() as u32
    };

    CycleLengthSummary { average, samples }
}

pub fn confidence_for_std_dev(sigma: f64) -> Confidence {
    if sigma <= HIGH_CONFIDENCE_MAX_STD_DEV {
        Confidence::High
    } else if sigma <= MEDIUM_CONFIDENCE_MAX_STD_DEV {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn regularity_for_std_dev(sigma: f64) -> Regularity {
    match confidence_for_std_dev(sigma) {
        Confidence::High => Regularity::Regular,
        Confidence::Medium => Regularity::SomewhatIrregular,
        Confidence::Low => Regularity::Irregular,
    }
}

/// Summary statistics over a user's full history.
///
/// Averages and spread only use plausible cycle lengths; shortest/longest
/// report what was actually recorded. Regularity needs at least two samples.
pub fn cycle_stats(history: &[PeriodCycle]) -> CycleStats {
    let mut ordered: Vec<&PeriodCycle> = history.iter().collect();
    ordered.sort_by_key(|c| c.start_date);

    let recorded: Vec<i32> = ordered.iter().filter_map(|c| c.cycle_length).collect();
    let plausible: Vec<f64> = recorded
        .iter()
        .copied()
        .filter(|&len| is_plausible_cycle_length(len))
        .map(f64::from)
        .collect();
    let periods: Vec<f64> = ordered
        .iter()
        .filter_map(|c| c.period_length)
        .map(f64::from)
        .collect();

    let std_dev = if plausible.len() >= 2 {
        population_std_dev(&plausible)
    } else {
        None
    };

    CycleStats {
        total_cycles: ordered.len(),
        average_cycle_length: mean(&plausible),
        average_period_length: mean(&periods),
        shortest_cycle: recorded.iter().copied().min(),
        longest_cycle: recorded.iter().copied().max(),
        cycle_length_std_dev: std_dev,
        regularity: std_dev.map(regularity_for_std_dev),
        cycles: ordered
            .iter()
            .map(|c| CycleStat {
                start_date: c.start_date,
                cycle_length: c.cycle_length,
                period_length: c.period_length,
            })
            .collect(),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn population_std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
