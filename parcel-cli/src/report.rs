//! Plain text renderings of plans and API results.
//!
//! Each report is a borrowed view with a [`fmt::Display`] impl. Absent API
//! sections print as zeros, the same way the dashboard cards fall back when a
//! response omits a field.

use std::fmt;

use parcel_core::ReferenceCatalog;
use parcel_core::calculations::{DischargePlan, PlanTotals};
use parcel_core::calculations::common::round_half_up;
use parcel_core::dashboard::{DashboardData, mock_levers};
use parcel_core::models::{
    ApiVessel, ForecastData, HealthStatus, KpiData, Port, Route, RouteAnalysis,
    SensitivityAnalysis, StrategicLever, VesselField,
};
use rust_decimal::Decimal;

/// Inserts `,` every three digits into the integer part of `digits`.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

/// US dollars with no fraction digits: `$1,234`, `-$5,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{:.0}", rounded.abs())))
}

/// One decimal place, `0.0%` when absent.
pub fn format_percentage(value: Option<f64>) -> String {
    format!("{:.1}%", value.unwrap_or_default())
}

/// Plan amounts: grouped, up to three fraction digits, trailing zeros dropped.
pub fn format_amount(amount: Decimal) -> String {
    let normalized = amount.round_dp(3).normalize();
    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", group_thousands(&normalized.abs().to_string()))
}

/// The confirmation line shown after a recompute.
pub fn simulation_summary(totals: &PlanTotals) -> String {
    format!(
        "Simulation complete! Total gang costs: ${}, Grand total: ${:.2}",
        format_amount(totals.total_gang_cost),
        round_half_up(totals.grand_total)
    )
}

/// The gang schedule, cost breakdown and vessel record after a recompute.
pub struct PlanReport<'a> {
    pub plan: &'a DischargePlan,
    pub totals: &'a PlanTotals,
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Gang Schedule")?;
        writeln!(
            f,
            "{:<4} {:<16} {:<12} {:>6} {:>14} {:>14}",
            "#", "Day", "Shift", "Gangs", "Cost/Gang", "Total"
        )?;
        for (index, row) in self.plan.rows().iter().enumerate() {
            writeln!(
                f,
                "{:<4} {:<16} {:<12} {:>6} {:>14} {:>14}",
                index + 1,
                row.day_type(),
                row.shift_time(),
                row.number_of_gangs(),
                format!("${}", format_amount(row.cost_per_gang())),
                format!("${}", format_amount(row.total_cost())),
            )?;
        }

        let breakdown = self.plan.cost_breakdown();
        writeln!(f)?;
        writeln!(f, "Weekday:  ${}", format_amount(breakdown.weekday))?;
        writeln!(f, "Weekend:  ${}", format_amount(breakdown.weekend))?;
        writeln!(f, "Holiday:  ${}", format_amount(breakdown.holiday))?;

        let vessel = self.plan.vessel();
        writeln!(f)?;
        writeln!(f, "Vessel Information")?;
        for field in VesselField::all() {
            let value = match field {
                VesselField::VesselName => vessel.vessel_name.clone(),
                VesselField::Tonnage => format_amount(vessel.tonnage),
                VesselField::Discharge => format_amount(vessel.discharge),
                VesselField::BcmeaRate => format_amount(vessel.bcmea_rate),
                VesselField::DockCost => format_amount(vessel.dock_cost),
                VesselField::BcmeaAssurance => format_amount(vessel.bcmea_assurance),
                VesselField::UnderHolding => format_amount(vessel.under_holding),
            };
            writeln!(f, "  {:<16} {}", field.label(), value)?;
        }
        writeln!(
            f,
            "  {:<16} {:.2}",
            "Grand Total",
            round_half_up(vessel.grand_total())
        )?;

        writeln!(f)?;
        writeln!(f, "{}", simulation_summary(self.totals))
    }
}

fn kpi_section(
    f: &mut fmt::Formatter<'_>,
    kpis: Option<&KpiData>,
) -> fmt::Result {
    writeln!(f, "Key Metrics")?;
    writeln!(
        f,
        "  Total Expected Margin   {}",
        format_currency(kpis.map_or(0.0, |k| k.total_expected_margin))
    )?;
    writeln!(
        f,
        "  Disruption Probability  {}",
        format_percentage(kpis.map(|k| k.disruption_probability))
    )?;
    writeln!(
        f,
        "  Cost of Uncertainty     {}",
        format_currency(kpis.map_or(0.0, |k| k.cost_of_uncertainty))
    )?;
    writeln!(
        f,
        "  Top Risk Ports          {}",
        kpis.map_or(0, |k| k.top_ports_by_risk.len())
    )
}

/// Expected savings as a share of the baseline, `0.0%` without both figures.
pub fn risk_adjusted_roi(forecast: Option<&ForecastData>) -> String {
    let roi = forecast.and_then(|f| {
        let expected = f.potential_savings.expected;
        (f.baseline_cost != 0.0 && expected != 0.0).then(|| expected / f.baseline_cost * 100.0)
    });
    format_percentage(roi)
}

fn forecast_section(
    f: &mut fmt::Formatter<'_>,
    forecast: Option<&ForecastData>,
) -> fmt::Result {
    let savings = forecast.map(|fc| fc.potential_savings).unwrap_or_default();
    writeln!(f, "Forecast")?;
    writeln!(
        f,
        "  Baseline Cost      {}",
        format_currency(forecast.map_or(0.0, |fc| fc.baseline_cost))
    )?;
    writeln!(f, "  Best Case          {}", format_currency(savings.best_case))?;
    writeln!(f, "  Expected           {}", format_currency(savings.expected))?;
    writeln!(f, "  Worst Case         {}", format_currency(savings.worst_case))?;
    writeln!(f, "  Risk-Adjusted ROI  {}", risk_adjusted_roi(forecast))?;
    writeln!(
        f,
        "  Savings Range      {} - {}",
        format_currency(savings.worst_case),
        format_currency(savings.best_case)
    )
}

fn signed_currency(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

fn routes_section(
    f: &mut fmt::Formatter<'_>,
    routes: &[Route],
) -> fmt::Result {
    writeln!(f, "Route Scorecard")?;
    writeln!(
        f,
        "  {:<10} {:<12} {:>10} {:>10} {:>10} {:>6} {:>10} {:<8}",
        "Route", "Origin", "Base", "Risk", "P95", "Days", "Savings", "Action"
    )?;
    for route in routes {
        writeln!(
            f,
            "  {:<10} {:<12} {:>10} {:>10} {:>10} {:>6.1} {:>10} {:<8}",
            route.name,
            route.origin_port.name,
            format_currency(route.base_cost),
            format_currency(route.risk_cost),
            format_currency(route.p95_cost),
            route.estimated_days,
            signed_currency(route.savings),
            route.recommendation.label(),
        )?;
    }
    Ok(())
}

fn priority_score(lever: &StrategicLever) -> String {
    lever
        .priority_score()
        .map_or_else(|| "-".to_string(), |score| format!("{score:.0}"))
}

/// Lists `levers`, or the demonstration levers when the analysis found none.
fn levers_section(
    f: &mut fmt::Formatter<'_>,
    levers: &[StrategicLever],
) -> fmt::Result {
    let demonstration;
    let levers = if levers.is_empty() {
        demonstration = mock_levers();
        writeln!(f, "Strategic Levers (examples)")?;
        demonstration.as_slice()
    } else {
        writeln!(f, "Strategic Levers")?;
        levers
    };

    for lever in levers {
        writeln!(
            f,
            "  {} ({}): saves {}, invest {}, ROI {}, priority {}",
            lever.kind.title(),
            lever.port.name,
            format_currency(lever.potential_savings),
            format_currency(lever.investment_required),
            format_percentage(Some(lever.roi)),
            priority_score(lever),
        )?;
        if !lever.description.is_empty() {
            writeln!(f, "    {}", lever.description)?;
        }
    }
    Ok(())
}

pub struct DashboardReport<'a>(pub &'a DashboardData);

impl fmt::Display for DashboardReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let data = self.0;
        kpi_section(f, data.kpis.as_ref())?;
        writeln!(f)?;
        forecast_section(f, data.forecast.as_ref())?;
        writeln!(f)?;
        routes_section(f, &data.routes)?;
        writeln!(f)?;
        writeln!(f, "Ports loaded: {}", data.ports.len())?;
        writeln!(f)?;
        levers_section(f, &data.strategic_levers)
    }
}

pub fn health_report(health: &HealthStatus) -> String {
    match &health.timestamp {
        Some(timestamp) => format!("API status: {} ({timestamp})", health.status),
        None => format!("API status: {}", health.status),
    }
}

fn optional_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub struct PortsReport<'a>(pub &'a [Port]);

impl fmt::Display for PortsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:<16} {:<16} {:>10} {:>11} {:>9}",
            "Port", "Country", "Region", "Corruption", "Reliability", "Delay (d)"
        )?;
        for port in self.0 {
            writeln!(
                f,
                "{:<20} {:<16} {:<16} {:>10} {:>11} {:>9}",
                port.name,
                port.country,
                port.region,
                optional_metric(port.corruption_index),
                optional_metric(port.reliability_score),
                optional_metric(port.average_delay_days),
            )?;
        }
        writeln!(f, "{} ports", self.0.len())
    }
}

pub struct VesselsReport<'a>(pub &'a [ApiVessel]);

impl fmt::Display for VesselsReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>10} {:>9} {:>8} {:>8}",
            "Vessel", "Tonnage", "Discharge", "BCMEA", "Dock"
        )?;
        for vessel in self.0 {
            writeln!(
                f,
                "{:<24} {:>10.0} {:>9.1} {:>8.2} {:>8.2}",
                vessel.name, vessel.tonnage, vessel.discharge, vessel.bcmea_rate, vessel.dock_cost
            )?;
        }
        writeln!(f, "{} vessels", self.0.len())
    }
}

pub struct SensitivityReport<'a>(pub &'a [SensitivityAnalysis]);

impl fmt::Display for SensitivityReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>10} {:>10} {:>11} {:<10}",
            "Port", "Threshold", "Current", "Break-even", "Economical"
        )?;
        for result in self.0 {
            writeln!(
                f,
                "{:<20} {:>10.1} {:>10.1} {:>11.1} {:<10}",
                result.port.name,
                result.corruption_threshold,
                result.current_corruption_rate,
                result.break_even_point,
                if result.is_economical { "yes" } else { "no" },
            )?;
        }
        Ok(())
    }
}

pub struct RouteAnalysisReport<'a>(pub &'a [RouteAnalysis]);

impl fmt::Display for RouteAnalysisReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>10} {:>10} {:>10} {:>10} {:>8} {:<8}",
            "Route", "Base", "Risk", "P95", "Margin", "Disrupt", "Action"
        )?;
        for analysis in self.0 {
            writeln!(
                f,
                "{:<14} {:>10} {:>10} {:>10} {:>10} {:>8} {:<8}",
                analysis.name,
                format_currency(analysis.base_cost),
                format_currency(analysis.risk_cost),
                format_currency(analysis.p95_cost),
                format_currency(analysis.expected_margin),
                format_percentage(Some(analysis.disruption_probability)),
                analysis.recommendation.label(),
            )?;
        }
        Ok(())
    }
}

/// Reference catalogs filtered by an optional case-insensitive name search.
pub struct CatalogReport<'a> {
    pub catalog: &'a ReferenceCatalog,
    pub search: Option<&'a str>,
}

impl fmt::Display for CatalogReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let term = self.search.unwrap_or("");

        writeln!(f, "Ports")?;
        writeln!(
            f,
            "  {:<18} {:>5} {:>10} {:>6} {:>9} {:>6}",
            "Name", "Gangs", "Cost/Gang", "BCMEA", "Discharge", "Dock"
        )?;
        for port in self.catalog.search_ports(term) {
            writeln!(
                f,
                "  {:<18} {:>5} {:>10} {:>6} {:>9} {:>6}",
                port.name,
                port.gangs,
                format_amount(port.cost_per_gang),
                port.bcmea_rate,
                port.discharge_days,
                port.dock_cost,
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Vessels")?;
        for vessel in self.catalog.search_vessels(term) {
            writeln!(
                f,
                "  {:<22} {:>8} MT",
                vessel.name,
                format_amount(vessel.tonnage)
            )?;
        }
        Ok(())
    }
}
