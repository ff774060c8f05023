use chrono::{Duration, NaiveDate};

use crate::models::{ChanceLevel, FertileWindow, PregnancyChances};

/// Luteal phase length assumed when placing ovulation before the next period.
const LUTEAL_DAYS: i64 = 14;
const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;
const FERTILE_DAYS_AFTER_OVULATION: i64 = 1;

/// Pregnancy likelihood by cycle day alone, independent of phase boundaries.
pub fn pregnancy_chances(day_in_cycle: u32) -> PregnancyChances {
    let (level, description) = match day_in_cycle {
        0..=5 => (ChanceLevel::VeryLow, "Menstruation. Pregnancy is very unlikely."),
        6..=9 => (ChanceLevel::Low, "Early follicular phase. Chances are low but rising."),
        10..=11 => (ChanceLevel::Medium, "Approaching the fertile window. Chances are rising."),
        12..=16 => (ChanceLevel::High, "Fertile window around ovulation. Chances are highest."),
        17..=21 => (ChanceLevel::Medium, "Just past ovulation. Chances are dropping."),
        _ => (ChanceLevel::Low, "Late luteal phase. Pregnancy is unlikely."),
    };
    PregnancyChances { level, description }
}

pub fn fertile_window(next_period: NaiveDate) -> FertileWindow {
    let ovulation_date = next_period - Duration::days(LUTEAL_DAYS);
    FertileWindow {
        start: ovulation_date - Duration::days(FERTILE_DAYS_BEFORE_OVULATION),
        end: ovulation_date + Duration::days(FERTILE_DAYS_AFTER_OVULATION),
        ovulation_date,
    }
}
