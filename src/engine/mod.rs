//! Cycle phase engine.
//!
//! Pure functions over a user's logged periods: where today falls in the
//! cycle, what phase that is, how fertile the day is and when the next period
//! is expected. Callers load history first and pass it in as a slice; nothing
//! here touches storage or the clock.

pub mod fertility;
pub mod phase;
pub mod stats;

use chrono::{Duration, NaiveDate};

use crate::error::EngineError;
use crate::models::{CurrentCycleInfo, CurrentPhase, NextPeriodPrediction, PeriodCycle};

pub use fertility::{fertile_window, pregnancy_chances};
pub use phase::{classify_phase, day_in_cycle, guide, PhaseEstimate, PhaseGuide, DEFAULT_PERIOD_LENGTH};
pub use stats::{average_cycle_length, cycle_stats, CycleLengthSummary};

/// Which shape of result the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Phase, day and energy only.
    Basic,
    /// Adds pregnancy chances and the next-period prediction.
    Extended,
}

impl OutputMode {
    pub fn includes_predictions(self) -> bool {
        matches!(self, OutputMode::Extended)
    }
}

pub fn parse_reference_date(raw: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidInput(format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
    })
}

/// Bleeding length of the reference cycle: recorded value, then the logged
/// end date, then the default.
fn period_length_of(cycle: &PeriodCycle) -> u32 {
    cycle
        .period_length
        .filter(|&len| len > 0)
        .map(|len| len as u32)
        .or_else(|| {
            cycle
                .end_date
                .map(|end| (end - cycle.start_date).num_days() + 1)
                .filter(|&len| len > 0)
                .map(|len| len as u32)
        })
        .unwrap_or(DEFAULT_PERIOD_LENGTH)
}

fn estimate(history: &[PeriodCycle], reference: NaiveDate) -> Option<(PhaseEstimate, CycleLengthSummary)> {
    let latest = stats::sorted_by_recency(history).into_iter().next()?;
    let summary = average_cycle_length(history);
    let day = day_in_cycle(latest.start_date, reference, summary.average);
    let estimate = classify_phase(day, period_length_of(latest), summary.average);
    Some((estimate, summary))
}

pub fn predict_next_period(history: &[PeriodCycle], reference: NaiveDate) -> Option<NextPeriodPrediction> {
    let latest = stats::sorted_by_recency(history).into_iter().next()?;
    let summary = average_cycle_length(history);
    let date = latest.start_date + Duration::days(i64::from(summary.average));

    Some(NextPeriodPrediction {
        date,
        days_until: (date - reference).num_days(),
        confidence: summary.confidence(),
        fertile_window: fertile_window(date),
    })
}

/// Current cycle position for `reference`. An empty history yields the
/// all-`None` result rather than an error.
pub fn current_cycle_info(history: &[PeriodCycle], reference: NaiveDate, mode: OutputMode) -> CurrentCycleInfo {
    let Some((estimate, summary)) = estimate(history, reference) else {
        return CurrentCycleInfo::default();
    };

    tracing::debug!(
        day = estimate.day_in_cycle,
        phase = %estimate.phase,
        average = summary.average,
        samples = summary.samples.len(),
        "computed cycle position"
    );

    let mut info = CurrentCycleInfo {
        phase: Some(estimate.phase),
        day_in_cycle: Some(estimate.day_in_cycle),
        days_remaining: Some(estimate.days_remaining),
        energy_level: Some(estimate.energy_level),
        average_cycle_length: Some(summary.average),
        pregnancy_chances: None,
        next_period_prediction: None,
    };

    if mode.includes_predictions() {
        info.pregnancy_chances = Some(pregnancy_chances(estimate.day_in_cycle));
        info.next_period_prediction = predict_next_period(history, reference);
    }

    info
}

/// The simple shape: the `Basic` result plus the phase guide.
pub fn current_phase(history: &[PeriodCycle], reference: NaiveDate) -> Option<CurrentPhase> {
    let info = current_cycle_info(history, reference, OutputMode::Basic);
    let (phase, day_in_cycle, days_remaining, energy_level) =
        (info.phase?, info.day_in_cycle?, info.days_remaining?, info.energy_level?);
    let guide = guide(phase);
    Some(CurrentPhase {
        phase,
        name: guide.name,
        day_in_cycle,
        days_remaining,
        energy_level,
        description: guide.description,
        recommended_exercises: guide.recommended_exercises.to_vec(),
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{cycle, date, ended_cycle};
    use super::*;
    use crate::models::{ChanceLevel, Confidence, EnergyLevel, Phase};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_history_is_no_data() {
        let info = current_cycle_info(&[], date("2024-01-15"), OutputMode::Extended);
        assert_eq!(info, CurrentCycleInfo::default());
        assert!(current_phase(&[], date("2024-01-15")).is_none());
        assert!(predict_next_period(&[], date("2024-01-15")).is_none());
    }

    #[test]
    fn single_cycle_mid_month_is_ovulatory() {
        let history = vec![cycle("2024-01-01", Some(28))];
        let info = current_cycle_info(&history, date("2024-01-15"), OutputMode::Extended);
        assert_eq!(info.day_in_cycle, Some(15));
        assert_eq!(info.average_cycle_length, Some(28));
        assert_eq!(info.phase, Some(Phase::Ovulatory));
        assert_eq!(info.energy_level, Some(EnergyLevel::High));
        assert_eq!(info.days_remaining, Some(2));
        assert_eq!(info.pregnancy_chances.map(|p| p.level), Some(ChanceLevel::High));
    }

    #[test]
    fn two_close_cycles_predict_with_high_confidence() {
        let history = vec![cycle("2024-01-01", Some(30)), cycle("2023-12-02", Some(29))];
        let prediction = predict_next_period(&history, date("2024-01-29")).unwrap();
        assert_eq!(prediction.date, date("2024-01-31"));
        assert_eq!(prediction.days_until, 2);
        assert_eq!(prediction.confidence, Confidence::High);
        assert_eq!(prediction.fertile_window.ovulation_date, date("2024-01-17"));
    }

    #[test]
    fn ongoing_period_without_lengths_uses_defaults() {
        let history = vec![cycle("2024-05-01", None)];
        let info = current_cycle_info(&history, date("2024-05-03"), OutputMode::Extended);
        assert_eq!(info.phase, Some(Phase::Menstrual));
        assert_eq!(info.days_remaining, Some(3));
        let prediction = info.next_period_prediction.unwrap();
        assert_eq!(prediction.date, date("2024-05-29"));
        assert_eq!(prediction.confidence, Confidence::Low);
    }

    #[test]
    fn recorded_end_date_sets_period_length() {
        let mut latest = ended_cycle("2024-05-01", "2024-05-03", None);
        latest.period_length = None;
        let info = current_cycle_info(&[latest], date("2024-05-04"), OutputMode::Basic);
        assert_eq!(info.phase, Some(Phase::Follicular));
    }

    #[test]
    fn basic_mode_omits_predictions() {
        let history = vec![cycle("2024-01-01", Some(28))];
        let info = current_cycle_info(&history, date("2024-01-10"), OutputMode::Basic);
        assert!(info.phase.is_some());
        assert!(info.pregnancy_chances.is_none());
        assert!(info.next_period_prediction.is_none());
    }

    #[test]
    fn most_recent_record_wins_regardless_of_input_order() {
        let history = vec![
            cycle("2023-11-05", Some(27)),
            cycle("2024-01-01", None),
            cycle("2023-12-02", Some(30)),
        ];
        let info = current_cycle_info(&history, date("2024-01-02"), OutputMode::Basic);
        assert_eq!(info.day_in_cycle, Some(2));
    }

    #[test]
    fn spread_out_history_lowers_confidence() {
        let history = vec![
            cycle("2024-04-01", Some(21)),
            cycle("2024-03-01", Some(35)),
            cycle("2024-02-01", Some(21)),
            cycle("2024-01-01", Some(35)),
        ];
        let prediction = predict_next_period(&history, date("2024-04-02")).unwrap();
        assert_eq!(prediction.confidence, Confidence::Medium);

        let history = vec![cycle("2024-02-01", Some(21)), cycle("2024-01-01", Some(35)), cycle("2023-12-01", Some(21))];
        // mean 25.67, sigma 6.6
        assert_eq!(predict_next_period(&history, date("2024-02-02")).unwrap().confidence, Confidence::Medium);

        let history = vec![cycle("2024-02-01", Some(45)), cycle("2024-01-01", Some(17))];
        assert_eq!(predict_next_period(&history, date("2024-02-02")).unwrap().confidence, Confidence::Low);
    }

    #[test]
    fn overdue_reference_wraps_into_next_cycle() {
        let history = vec![cycle("2024-01-01", Some(28))];
        let info = current_cycle_info(&history, date("2024-02-05"), OutputMode::Extended);
        assert_eq!(info.day_in_cycle, Some(8));
        assert_eq!(info.phase, Some(Phase::Follicular));
        let prediction = info.next_period_prediction.unwrap();
        assert_eq!(prediction.date, date("2024-01-29"));
        assert_eq!(prediction.days_until, -7);
    }

    #[test]
    fn current_phase_matches_basic_info() {
        let history = vec![ended_cycle("2024-01-01", "2024-01-06", Some(30)), cycle("2023-12-02", Some(30))];
        let reference = date("2024-01-09");
        let info = current_cycle_info(&history, reference, OutputMode::Basic);
        let phase = current_phase(&history, reference).unwrap();
        assert_eq!(info.phase, Some(phase.phase));
        assert_eq!(info.day_in_cycle, Some(phase.day_in_cycle));
        assert_eq!(info.days_remaining, Some(phase.days_remaining));
        assert_eq!(info.energy_level, Some(phase.energy_level));
    }

    #[test]
    fn current_phase_carries_guide() {
        let history = vec![cycle("2024-01-01", Some(28))];
        let phase = current_phase(&history, date("2024-01-20")).unwrap();
        assert_eq!(phase.phase, Phase::Luteal);
        assert_eq!(phase.name, "Luteal Phase");
        assert_eq!(phase.days_remaining, 9);
        assert!(!phase.recommended_exercises.is_empty());
    }

    #[test]
    fn identical_inputs_serialize_identically() {
        let history = vec![cycle("2024-01-01", Some(30)), cycle("2023-12-02", Some(29))];
        let a = serde_json::to_string(&current_cycle_info(&history, date("2024-01-20"), OutputMode::Extended)).unwrap();
        let b = serde_json::to_string(&current_cycle_info(&history, date("2024-01-20"), OutputMode::Extended)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_malformed_reference_dates() {
        assert_eq!(parse_reference_date("2024-02-29").unwrap(), date("2024-02-29"));
        assert!(matches!(parse_reference_date("29/02/2024"), Err(EngineError::InvalidInput(_))));
        assert!(parse_reference_date("2023-02-29").is_err());
    }
}
