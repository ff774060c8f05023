use serde::{ Serialize, Deserialize };
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowIntensity {
    Light,
    Moderate,
    Heavy,
}

impl FlowIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowIntensity::Light => "light",
            FlowIntensity::Moderate => "moderate",
            FlowIntensity::Heavy => "heavy",
        }
    }
}

impl FromStr for FlowIntensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(FlowIntensity::Light),
            "moderate" => Ok(FlowIntensity::Moderate),
            "heavy" => Ok(FlowIntensity::Heavy),
            other => Err(format!("unknown flow intensity: {other}")),
        }
    }
}

/// One logged period. `cycle_length` is only known once the next period starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCycle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
    pub flow_intensity: Option<FlowIntensity>,
    pub created_at: DateTime<Utc>,
}

impl PeriodCycle {
    pub fn new(user_id: Uuid, start_date: NaiveDate, flow_intensity: Option<FlowIntensity>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            start_date,
            end_date: None,
            cycle_length: None,
            period_length: None,
            flow_intensity,
            created_at: Utc::now(),
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Menstrual => "menstrual",
            Phase::Follicular => "follicular",
            Phase::Ovulatory => "ovulatory",
            Phase::Luteal => "luteal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Building,
    High,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChanceLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularity {
    Regular,
    SomewhatIrregular,
    Irregular,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PregnancyChances {
    pub level: ChanceLevel,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ovulation_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextPeriodPrediction {
    pub date: NaiveDate,
    pub days_until: i64,
    pub confidence: Confidence,
    pub fertile_window: FertileWindow,
}

/// Derived on every request; every field is `None` when there is no history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurrentCycleInfo {
    pub phase: Option<Phase>,
    pub day_in_cycle: Option<u32>,
    pub days_remaining: Option<u32>,
    pub energy_level: Option<EnergyLevel>,
    pub average_cycle_length: Option<u32>,
    pub pregnancy_chances: Option<PregnancyChances>,
    pub next_period_prediction: Option<NextPeriodPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPhase {
    pub phase: Phase,
    pub name: &'static str,
    pub day_in_cycle: u32,
    pub days_remaining: u32,
    pub energy_level: EnergyLevel,
    pub description: &'static str,
    pub recommended_exercises: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStat {
    pub start_date: NaiveDate,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub average_cycle_length: Option<f64>,
    pub average_period_length: Option<f64>,
    pub shortest_cycle: Option<i32>,
    pub longest_cycle: Option<i32>,
    pub cycle_length_std_dev: Option<f64>,
    pub regularity: Option<Regularity>,
    pub cycles: Vec<CycleStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_levels_serialize_with_spaces() {
        assert_eq!(serde_json::to_string(&ChanceLevel::VeryLow).unwrap(), "\"Very Low\"");
        assert_eq!(serde_json::to_string(&ChanceLevel::High).unwrap(), "\"High\"");
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn flow_intensity_parses_lowercase_names() {
        assert_eq!("heavy".parse::<FlowIntensity>(), Ok(FlowIntensity::Heavy));
        assert!("spotting".parse::<FlowIntensity>().is_err());
        assert_eq!(FlowIntensity::Moderate.as_str(), "moderate");
    }
}
