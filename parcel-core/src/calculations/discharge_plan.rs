//! Port Discharge Plan calculations.
//!
//! A discharge plan combines a fixed seven-row gang schedule with the cost
//! parameters of one vessel call.
//!
//! # Derived values
//!
//! | Value            | Rule |
//! |------------------|------|
//! | row `total_cost` | `number_of_gangs × cost_per_gang`, refreshed on every row edit |
//! | gang cost total  | sum of every row's `total_cost` |
//! | `grand_total`    | `bcmea_rate + dock_cost + bcmea_assurance + under_holding`, refreshed only by [`DischargePlan::simulate`] |
//!
//! A product or sum too large for [`Decimal`] is logged and stored as zero,
//! the same as unparseable input.
//!
//! # Reference selections
//!
//! Selecting a port and selecting a vessel touch disjoint sets of fields:
//!
//! | Selection | Overwrites |
//! |-----------|------------|
//! | port      | every row's gangs and cost per gang; vessel `discharge`, `bcmea_rate`, `dock_cost` |
//! | vessel    | vessel `vessel_name`, `tonnage` |
//!
//! Every row receives identical staffing from a port. That uniform staffing is
//! the intended model of a port call, not an approximation.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use parcel_core::calculations::DischargePlan;
//! use parcel_core::models::GangField;
//! use parcel_core::ReferenceCatalog;
//!
//! let catalog = ReferenceCatalog::builtin();
//! let mut plan = DischargePlan::new();
//!
//! plan.select_port(catalog.find_port("Callao").unwrap());
//! plan.set_row_field(0, GangField::NumberOfGangs, "4").unwrap();
//!
//! let totals = plan.simulate();
//!
//! assert_eq!(plan.rows()[0].total_cost(), dec!(64000));
//! assert_eq!(totals.total_gang_cost, dec!(352000));
//! assert_eq!(totals.grand_total, dec!(3.90));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{checked_sum, coerce_count, coerce_decimal};
use crate::models::{
    DayCategory, GangField, GangScheduleRow, ReferencePort, ReferenceVessel, VesselField,
    VesselInfo, default_gang_schedule,
};

/// Errors that can occur while editing a discharge plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The row index does not address one of the schedule rows.
    #[error("row index {index} is out of range (schedule has {len} rows)")]
    RowIndexOutOfRange { index: usize, len: usize },
}

/// Confirmation produced by the recompute action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanTotals {
    /// Sum of every row's `total_cost`.
    pub total_gang_cost: Decimal,
    /// The vessel's freshly computed grand total.
    pub grand_total: Decimal,
}

/// Gang costs grouped by day category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub weekday: Decimal,
    pub weekend: Decimal,
    pub holiday: Decimal,
    pub total: Decimal,
}

/// Overwrites staffing and port-driven vessel costs from `port`.
///
/// Returns new values and leaves the inputs untouched.
pub fn apply_port_selection(
    rows: &[GangScheduleRow],
    vessel: &VesselInfo,
    port: &ReferencePort,
) -> (Vec<GangScheduleRow>, VesselInfo) {
    let rows = rows
        .iter()
        .map(|row| row.with_staffing(port.gangs, port.cost_per_gang))
        .collect();

    let vessel = VesselInfo {
        discharge: port.discharge_days,
        bcmea_rate: port.bcmea_rate,
        dock_cost: port.dock_cost,
        ..vessel.clone()
    };

    (rows, vessel)
}

/// Overwrites the vessel name and tonnage from `reference`.
pub fn apply_vessel_selection(
    vessel: &VesselInfo,
    reference: &ReferenceVessel,
) -> VesselInfo {
    VesselInfo {
        vessel_name: reference.name.clone(),
        tonnage: reference.tonnage,
        ..vessel.clone()
    }
}

/// Computes the grand total for a vessel from its current cost fields.
pub fn compute_grand_total(vessel: &VesselInfo) -> Decimal {
    checked_sum([
        vessel.bcmea_rate,
        vessel.dock_cost,
        vessel.bcmea_assurance,
        vessel.under_holding,
    ])
}

/// Sums `total_cost` over the rows.
pub fn total_gang_cost(rows: &[GangScheduleRow]) -> Decimal {
    checked_sum(rows.iter().map(GangScheduleRow::total_cost))
}

/// Editable discharge plan: the gang schedule plus the vessel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DischargePlan {
    rows: Vec<GangScheduleRow>,
    vessel: VesselInfo,
}

impl Default for DischargePlan {
    fn default() -> Self {
        Self::new()
    }
}

impl DischargePlan {
    /// Creates a plan seeded with the default schedule and vessel.
    pub fn new() -> Self {
        Self {
            rows: default_gang_schedule(),
            vessel: VesselInfo::default(),
        }
    }

    pub fn rows(&self) -> &[GangScheduleRow] {
        &self.rows
    }

    pub fn vessel(&self) -> &VesselInfo {
        &self.vessel
    }

    /// Edits one staffing field of one row and recomputes that row's total.
    ///
    /// `value` is coerced: gangs become a non-negative whole number and cost
    /// a non-negative amount, with zero for anything unparseable.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::RowIndexOutOfRange`] if `row_index` does not
    /// address a row; the plan is unchanged in that case.
    pub fn set_row_field(
        &mut self,
        row_index: usize,
        field: GangField,
        value: &str,
    ) -> Result<&GangScheduleRow, PlanError> {
        let len = self.rows.len();
        let current = self
            .rows
            .get(row_index)
            .ok_or(PlanError::RowIndexOutOfRange {
                index: row_index,
                len,
            })?;

        let updated = match field {
            GangField::NumberOfGangs => {
                current.with_staffing(coerce_count(value), current.cost_per_gang())
            }
            GangField::CostPerGang => {
                current.with_staffing(current.number_of_gangs(), coerce_decimal(value))
            }
        };
        debug!(row = row_index, %field, total = %updated.total_cost(), "gang row updated");

        self.rows[row_index] = updated;
        Ok(&self.rows[row_index])
    }

    /// Edits one vessel field. Numeric fields use the zero-fallback coercion;
    /// the vessel name is stored as given.
    pub fn set_vessel_field(
        &mut self,
        field: VesselField,
        value: &str,
    ) {
        let mut vessel = self.vessel.clone();
        match field {
            VesselField::VesselName => vessel.vessel_name = value.to_string(),
            VesselField::Tonnage => vessel.tonnage = coerce_decimal(value),
            VesselField::Discharge => vessel.discharge = coerce_decimal(value),
            VesselField::BcmeaRate => vessel.bcmea_rate = coerce_decimal(value),
            VesselField::DockCost => vessel.dock_cost = coerce_decimal(value),
            VesselField::BcmeaAssurance => vessel.bcmea_assurance = coerce_decimal(value),
            VesselField::UnderHolding => vessel.under_holding = coerce_decimal(value),
        }
        debug!(%field, "vessel field updated");
        self.vessel = vessel;
    }

    /// Applies a port from the reference catalog.
    pub fn select_port(
        &mut self,
        port: &ReferencePort,
    ) {
        let (rows, vessel) = apply_port_selection(&self.rows, &self.vessel, port);
        debug!(port = %port.name, "port selected");
        self.rows = rows;
        self.vessel = vessel;
    }

    /// Applies a vessel from the reference catalog.
    pub fn select_vessel(
        &mut self,
        reference: &ReferenceVessel,
    ) {
        debug!(vessel = %reference.name, "vessel selected");
        self.vessel = apply_vessel_selection(&self.vessel, reference);
    }

    /// Sum of every row's total cost.
    pub fn total_gang_cost(&self) -> Decimal {
        total_gang_cost(&self.rows)
    }

    /// Gang costs grouped by weekday, weekend and holiday rows.
    pub fn cost_breakdown(&self) -> CostBreakdown {
        let category_total = |category: DayCategory| {
            checked_sum(
                self.rows
                    .iter()
                    .filter(|row| row.category() == category)
                    .map(GangScheduleRow::total_cost),
            )
        };

        CostBreakdown {
            weekday: category_total(DayCategory::Weekday),
            weekend: category_total(DayCategory::Weekend),
            holiday: category_total(DayCategory::Holiday),
            total: self.total_gang_cost(),
        }
    }

    /// The recompute action: refreshes `grand_total` and reports the totals.
    ///
    /// Depends only on current state, so repeated calls without edits in
    /// between return the same totals.
    pub fn simulate(&mut self) -> PlanTotals {
        let grand_total = compute_grand_total(&self.vessel);
        self.vessel = VesselInfo {
            grand_total,
            ..self.vessel.clone()
        };

        PlanTotals {
            total_gang_cost: self.total_gang_cost(),
            grand_total,
        }
    }

    /// Restores the seeded schedule and default vessel.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
