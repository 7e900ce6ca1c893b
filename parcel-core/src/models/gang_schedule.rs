use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::common::checked_product;

/// Broad grouping of a shift's day type, used for cost breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Weekday,
    Weekend,
    Holiday,
}

impl DayCategory {
    /// Classifies a free-form day label such as `"Mon - Fri"` or `"Sun"`.
    ///
    /// Anything that is not recognisably a weekend or holiday is treated as a
    /// weekday.
    pub fn classify(day_type: &str) -> Self {
        let lowered = day_type.to_lowercase();
        if lowered.contains("holiday") {
            Self::Holiday
        } else if lowered.starts_with("sat") || lowered.starts_with("sun") || lowered == "weekend"
        {
            Self::Weekend
        } else {
            Self::Weekday
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weekday => "Weekday",
            Self::Weekend => "Weekend",
            Self::Holiday => "Holiday",
        }
    }
}

/// The editable columns of a gang schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GangField {
    NumberOfGangs,
    CostPerGang,
}

impl FromStr for GangField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "gangs" | "numberofgangs" => Ok(Self::NumberOfGangs),
            "cost" | "costpergang" => Ok(Self::CostPerGang),
            other => Err(format!("unknown gang schedule field '{other}'")),
        }
    }
}

impl fmt::Display for GangField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::NumberOfGangs => write!(f, "number_of_gangs"),
            Self::CostPerGang => write!(f, "cost_per_gang"),
        }
    }
}

/// One shift slot in the discharge plan's gang schedule.
///
/// `total_cost` is always `number_of_gangs * cost_per_gang`, or zero when
/// that product does not fit a [`Decimal`]; the fields are private so the product can only change through [`GangScheduleRow::with_staffing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GangScheduleRow {
    day_type: String,
    shift_time: String,
    number_of_gangs: u32,
    cost_per_gang: Decimal,
    total_cost: Decimal,
}

impl GangScheduleRow {
    pub fn new(
        day_type: impl Into<String>,
        shift_time: impl Into<String>,
        number_of_gangs: u32,
        cost_per_gang: Decimal,
    ) -> Self {
        Self {
            day_type: day_type.into(),
            shift_time: shift_time.into(),
            number_of_gangs,
            cost_per_gang,
            total_cost: checked_product(number_of_gangs, cost_per_gang),
        }
    }

    /// Returns a copy of this row with new staffing and a recomputed total.
    pub fn with_staffing(
        &self,
        number_of_gangs: u32,
        cost_per_gang: Decimal,
    ) -> Self {
        Self::new(
            self.day_type.clone(),
            self.shift_time.clone(),
            number_of_gangs,
            cost_per_gang,
        )
    }

    pub fn day_type(&self) -> &str {
        &self.day_type
    }

    pub fn shift_time(&self) -> &str {
        &self.shift_time
    }

    pub fn number_of_gangs(&self) -> u32 {
        self.number_of_gangs
    }

    pub fn cost_per_gang(&self) -> Decimal {
        self.cost_per_gang
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn category(&self) -> DayCategory {
        DayCategory::classify(&self.day_type)
    }
}

/// The seven shift slots every discharge plan starts with.
pub fn default_gang_schedule() -> Vec<GangScheduleRow> {
    vec![
        GangScheduleRow::new("Mon - Fri", "08:00", 5, Decimal::from(13500)),
        GangScheduleRow::new("Mon - Fri", "16:30", 6, Decimal::from(15000)),
        GangScheduleRow::new("Mon - Fri", "01:00", 0, Decimal::from(16500)),
        GangScheduleRow::new("Sat", "08:00", 3, Decimal::from(14000)),
        GangScheduleRow::new("Sat", "16:30", 0, Decimal::from(16500)),
        GangScheduleRow::new("Sun", "All Shifts", 7, Decimal::from(17500)),
        GangScheduleRow::new("Holidays", "All Shifts", 0, Decimal::from(18000)),
    ]
}
