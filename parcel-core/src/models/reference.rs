use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::search::Named;

/// A discharge port from the reference catalog.
///
/// Selecting a port copies its staffing and cost parameters into the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePort {
    pub name: String,
    pub gangs: u32,
    pub cost_per_gang: Decimal,
    pub bcmea_rate: Decimal,
    pub discharge_days: Decimal,
    pub dock_cost: Decimal,
}

impl Named for ReferencePort {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A vessel from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceVessel {
    pub name: String,
    pub tonnage: Decimal,
}

impl Named for ReferenceVessel {
    fn name(&self) -> &str {
        &self.name
    }
}
