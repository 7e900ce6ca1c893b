//! Discharge plan calculation logic.

pub mod common;
pub mod discharge_plan;

pub use discharge_plan::{
    CostBreakdown, DischargePlan, PlanError, PlanTotals, apply_port_selection,
    apply_vessel_selection, compute_grand_total, total_gang_cost,
};
