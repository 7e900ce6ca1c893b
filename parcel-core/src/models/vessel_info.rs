use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

/// Vessel and cost parameters for a single port call.
///
/// `grand_total` is read-only from the outside and is only refreshed by the
/// plan's recompute action, so it may lag behind edits to the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VesselInfo {
    pub vessel_name: String,
    /// Cargo tonnage in metric tons.
    pub tonnage: Decimal,
    /// Discharge time in days.
    pub discharge: Decimal,
    pub bcmea_rate: Decimal,
    pub dock_cost: Decimal,
    pub bcmea_assurance: Decimal,
    pub under_holding: Decimal,
    pub(crate) grand_total: Decimal,
}

impl VesselInfo {
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }
}

impl Default for VesselInfo {
    fn default() -> Self {
        Self {
            vessel_name: "Steel Carrier Alpha".to_string(),
            tonnage: Decimal::from(20520),
            discharge: Decimal::from(5),
            bcmea_rate: Decimal::new(327, 2),
            dock_cost: Decimal::new(25, 2),
            bcmea_assurance: Decimal::ZERO,
            under_holding: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }
}

/// The user-editable fields of [`VesselInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselField {
    VesselName,
    Tonnage,
    Discharge,
    BcmeaRate,
    DockCost,
    BcmeaAssurance,
    UnderHolding,
}

impl VesselField {
    pub fn all() -> &'static [VesselField] {
        &[
            Self::VesselName,
            Self::Tonnage,
            Self::Discharge,
            Self::BcmeaRate,
            Self::DockCost,
            Self::BcmeaAssurance,
            Self::UnderHolding,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VesselName => "Vessel Name",
            Self::Tonnage => "Tonnage (MT)",
            Self::Discharge => "Discharge Days",
            Self::BcmeaRate => "BCMEA Rate",
            Self::DockCost => "Dock Cost",
            Self::BcmeaAssurance => "BCMEA Assurance",
            Self::UnderHolding => "Under Holding",
        }
    }
}

impl FromStr for VesselField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "name" | "vesselname" => Ok(Self::VesselName),
            "tonnage" => Ok(Self::Tonnage),
            "discharge" | "dischargedays" => Ok(Self::Discharge),
            "bcmearate" => Ok(Self::BcmeaRate),
            "dockcost" => Ok(Self::DockCost),
            "bcmeaassurance" => Ok(Self::BcmeaAssurance),
            "underholding" => Ok(Self::UnderHolding),
            "grandtotal" => Err("grand_total is computed and cannot be edited".to_string()),
            other => Err(format!("unknown vessel field '{other}'")),
        }
    }
}

impl fmt::Display for VesselField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
