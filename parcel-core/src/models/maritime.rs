//! Entities exchanged with the external analysis API.
//!
//! The API is an opaque collaborator, so decoding is lenient: every field
//! defaults when absent or `null` and accepts both camelCase and snake_case
//! keys.
//! Serialization uses snake_case, which is what the API expects in request
//! bodies.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{GangScheduleRow, VesselInfo};

/// Reads an explicit `null` as the field's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    #[serde(deserialize_with = "null_default")]
    pub lat: f64,
    #[serde(deserialize_with = "null_default")]
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub country: String,
    #[serde(deserialize_with = "null_default")]
    pub region: String,
    #[serde(deserialize_with = "null_default")]
    pub coordinates: Coordinates,
    #[serde(alias = "corruptionIndex", skip_serializing_if = "Option::is_none")]
    pub corruption_index: Option<f64>,
    #[serde(alias = "reliabilityScore", skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f64>,
    #[serde(alias = "averageDelayDays", skip_serializing_if = "Option::is_none")]
    pub average_delay_days: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Use,
    Avoid,
    Caution,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Use => "Use",
            Self::Avoid => "Avoid",
            Self::Caution => "Caution",
            Self::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(alias = "originPort", deserialize_with = "null_default")]
    pub origin_port: Port,
    #[serde(alias = "destinationPort", deserialize_with = "null_default")]
    pub destination_port: Port,
    /// Nautical miles.
    #[serde(deserialize_with = "null_default")]
    pub distance: f64,
    #[serde(alias = "estimatedDays", deserialize_with = "null_default")]
    pub estimated_days: f64,
    #[serde(alias = "baseCost", deserialize_with = "null_default")]
    pub base_cost: f64,
    #[serde(alias = "riskCost", deserialize_with = "null_default")]
    pub risk_cost: f64,
    #[serde(alias = "p95Cost", deserialize_with = "null_default")]
    pub p95_cost: f64,
    #[serde(alias = "expectedMargin", deserialize_with = "null_default")]
    pub expected_margin: f64,
    #[serde(alias = "disruptionProbability", deserialize_with = "null_default")]
    pub disruption_probability: f64,
    #[serde(deserialize_with = "null_default")]
    pub recommendation: Recommendation,
    #[serde(deserialize_with = "null_default")]
    pub savings: f64,
}

/// Per-route result of `POST /api/routes/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteAnalysis {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(alias = "baseCost", deserialize_with = "null_default")]
    pub base_cost: f64,
    #[serde(alias = "riskCost", deserialize_with = "null_default")]
    pub risk_cost: f64,
    #[serde(alias = "p95Cost", deserialize_with = "null_default")]
    pub p95_cost: f64,
    #[serde(alias = "expectedMargin", deserialize_with = "null_default")]
    pub expected_margin: f64,
    #[serde(alias = "disruptionProbability", deserialize_with = "null_default")]
    pub disruption_probability: f64,
    #[serde(deserialize_with = "null_default")]
    pub recommendation: Recommendation,
    #[serde(deserialize_with = "null_default")]
    pub savings: f64,
    #[serde(alias = "estimatedDays", deserialize_with = "null_default")]
    pub estimated_days: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    #[serde(deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "null_default")]
    pub expected: f64,
    #[serde(deserialize_with = "null_default")]
    pub realized: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiData {
    #[serde(alias = "totalExpectedMargin", deserialize_with = "null_default")]
    pub total_expected_margin: f64,
    #[serde(alias = "disruptionProbability", deserialize_with = "null_default")]
    pub disruption_probability: f64,
    #[serde(alias = "costOfUncertainty", deserialize_with = "null_default")]
    pub cost_of_uncertainty: f64,
    #[serde(alias = "topPortsByRisk", deserialize_with = "null_default")]
    pub top_ports_by_risk: Vec<Port>,
    #[serde(alias = "trendlineData", deserialize_with = "null_default")]
    pub trendline_data: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialSavings {
    #[serde(alias = "bestCase", deserialize_with = "null_default")]
    pub best_case: f64,
    #[serde(deserialize_with = "null_default")]
    pub expected: f64,
    #[serde(alias = "worstCase", deserialize_with = "null_default")]
    pub worst_case: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBucket {
    #[serde(deserialize_with = "null_default")]
    pub range: String,
    #[serde(deserialize_with = "null_default")]
    pub frequency: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastData {
    #[serde(alias = "baselineCost", deserialize_with = "null_default")]
    pub baseline_cost: f64,
    #[serde(alias = "potentialSavings", deserialize_with = "null_default")]
    pub potential_savings: PotentialSavings,
    #[serde(alias = "costDistribution", deserialize_with = "null_default")]
    pub cost_distribution: Vec<CostBucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeverKind {
    Relationship,
    Consolidation,
    Oversight,
    #[default]
    #[serde(other)]
    Other,
}

impl LeverKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Relationship => "Relationship Investment",
            Self::Consolidation => "Volume Consolidation",
            Self::Oversight => "Enhanced Oversight",
            Self::Other => "Strategic Initiative",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategicLever {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: LeverKind,
    #[serde(deserialize_with = "null_default")]
    pub port: Port,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    #[serde(alias = "potentialSavings", deserialize_with = "null_default")]
    pub potential_savings: f64,
    #[serde(alias = "investmentRequired", deserialize_with = "null_default")]
    pub investment_required: f64,
    #[serde(deserialize_with = "null_default")]
    pub roi: f64,
}

impl StrategicLever {
    /// Savings per unit of investment, scaled by ten and rounded half up.
    /// `None` unless the investment is positive.
    pub fn priority_score(&self) -> Option<f64> {
        (self.investment_required > 0.0)
            .then(|| (self.potential_savings / self.investment_required * 10.0 + 0.5).floor())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityAnalysis {
    #[serde(deserialize_with = "null_default")]
    pub port: Port,
    #[serde(alias = "corruptionThreshold", deserialize_with = "null_default")]
    pub corruption_threshold: f64,
    #[serde(alias = "currentCorruptionRate", deserialize_with = "null_default")]
    pub current_corruption_rate: f64,
    #[serde(alias = "isEconomical", deserialize_with = "null_default")]
    pub is_economical: bool,
    #[serde(alias = "breakEvenPoint", deserialize_with = "null_default")]
    pub break_even_point: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    #[serde(deserialize_with = "null_default")]
    pub status: String,
    pub timestamp: Option<String>,
}

/// Vessel shape used by the API, both in `GET /api/vessels` and in the
/// route analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiVessel {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub tonnage: f64,
    #[serde(deserialize_with = "null_default")]
    pub discharge: f64,
    #[serde(alias = "bcmeaRate", deserialize_with = "null_default")]
    pub bcmea_rate: f64,
    #[serde(alias = "dockCost", deserialize_with = "null_default")]
    pub dock_cost: f64,
    #[serde(alias = "bcmeaAssurance", deserialize_with = "null_default")]
    pub bcmea_assurance: f64,
    #[serde(alias = "underHolding", deserialize_with = "null_default")]
    pub under_holding: f64,
    #[serde(alias = "grandTotal", deserialize_with = "null_default")]
    pub grand_total: f64,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

impl From<&VesselInfo> for ApiVessel {
    fn from(vessel: &VesselInfo) -> Self {
        Self {
            id: String::new(),
            name: vessel.vessel_name.clone(),
            tonnage: to_f64(vessel.tonnage),
            discharge: to_f64(vessel.discharge),
            bcmea_rate: to_f64(vessel.bcmea_rate),
            dock_cost: to_f64(vessel.dock_cost),
            bcmea_assurance: to_f64(vessel.bcmea_assurance),
            under_holding: to_f64(vessel.under_holding),
            grand_total: to_f64(vessel.grand_total()),
        }
    }
}

/// Gang schedule shape used by the route analysis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiGangSchedule {
    pub day_type: String,
    pub shift_time: String,
    pub number_of_gangs: u32,
    pub cost_per_gang: f64,
    pub total_cost: f64,
}

impl From<&GangScheduleRow> for ApiGangSchedule {
    fn from(row: &GangScheduleRow) -> Self {
        Self {
            day_type: row.category().label().to_lowercase(),
            shift_time: row.shift_time().to_string(),
            number_of_gangs: row.number_of_gangs(),
            cost_per_gang: to_f64(row.cost_per_gang()),
            total_cost: to_f64(row.total_cost()),
        }
    }
}
