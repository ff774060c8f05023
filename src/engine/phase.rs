use chrono::NaiveDate;

use crate::models::{EnergyLevel, Phase};

/// Assumed bleeding length when the reference cycle has none recorded.
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseEstimate {
    pub phase: Phase,
    pub day_in_cycle: u32,
    pub days_remaining: u32,
    pub energy_level: EnergyLevel,
}

/// Position of `reference` inside a cycle of `average_length` days that
/// started on `start`. Dates past the expected end wrap into the next cycle.
pub fn day_in_cycle(start: NaiveDate, reference: NaiveDate, average_length: u32) -> u32 {
    let avg = i64::from(average_length.max(1));
    let mut day = (reference - start).num_days() + 1;
    if day > avg {
        day = ((day - 1) % avg) + 1;
    }
    day.clamp(1, avg) as u32
}

/// Proportional boundaries: follicular ends at floor(0.5 * avg), ovulatory at
/// floor(0.6 * avg). Ranges are checked in order so every day maps to one phase.
pub fn classify_phase(day: u32, period_length: u32, average_length: u32) -> PhaseEstimate {
    let avg = i64::from(average_length.max(1));
    let period = i64::from(period_length).clamp(1, avg);
    let follicular_end = avg / 2;
    let ovulatory_end = avg * 3 / 5;
    let d = i64::from(day);

    let (phase, phase_end, energy_level) = if d <= period {
        (Phase::Menstrual, period, EnergyLevel::Low)
    } else if d <= follicular_end {
        (Phase::Follicular, follicular_end, EnergyLevel::Building)
    } else if d <= ovulatory_end {
        (Phase::Ovulatory, ovulatory_end, EnergyLevel::High)
    } else {
        (Phase::Luteal, avg, EnergyLevel::Declining)
    };

    PhaseEstimate {
        phase,
        day_in_cycle: day,
        days_remaining: (phase_end - d + 1).max(0) as u32,
        energy_level,
    }
}

pub struct PhaseGuide {
    pub name: &'static str,
    pub description: &'static str,
    pub recommended_exercises: &'static [&'static str],
}

const MENSTRUAL: PhaseGuide = PhaseGuide {
    name: "Menstrual Phase",
    description: "Hormone levels are at their lowest. Rest, stay warm and favour gentle movement.",
    recommended_exercises: &["Gentle yoga", "Walking", "Stretching"],
};

const FOLLICULAR: PhaseGuide = PhaseGuide {
    name: "Follicular Phase",
    description: "Estrogen is rising and energy builds. A good time to try new workouts.",
    recommended_exercises: &["Cardio", "Dance", "Light strength training"],
};

const OVULATORY: PhaseGuide = PhaseGuide {
    name: "Ovulatory Phase",
    description: "Energy and strength peak around ovulation. Push intensity if you feel good.",
    recommended_exercises: &["HIIT", "Strength training", "Running"],
};

const LUTEAL: PhaseGuide = PhaseGuide {
    name: "Luteal Phase",
    description: "Progesterone rises and energy tapers. Keep moving with steadier, lower-impact sessions.",
    recommended_exercises: &["Pilates", "Moderate strength training", "Swimming"],
};

pub fn guide(phase: Phase) -> &'static PhaseGuide {
    match phase {
        Phase::Menstrual => &MENSTRUAL,
        Phase::Follicular => &FOLLICULAR,
        Phase::Ovulatory => &OVULATORY,
        Phase::Luteal => &LUTEAL,
    }
}
