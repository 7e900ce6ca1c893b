use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use parcel_core::models::{GangField, VesselField};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Port discharge planner and maritime analysis dashboard.
///
/// Plans are computed locally from the reference catalogs; the dashboard and
/// analysis commands talk to the configured analysis API.
#[derive(Debug, Parser)]
#[command(name = "parcel", version, about)]
pub struct Cli {
    /// Config file (defaults to ./parcel.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis API base URL; overrides config and PARCEL_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token; overrides config and PARCEL_API_TOKEN.
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a discharge plan, recompute it and print the result.
    Plan(PlanArgs),

    /// Load the dashboard and print the report.
    Dashboard {
        /// Extra attempts after a failed load.
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },

    /// Check that the analysis API is up.
    Health,

    /// List ports known to the analysis API.
    Ports,

    /// List vessels known to the analysis API.
    Vessels,

    /// Run the corruption sensitivity analysis over every API port.
    Sensitivity,

    /// Send the plan and the demonstration routes for route analysis.
    AnalyzeRoutes(PlanArgs),

    /// Submit the early-access lead form.
    SubmitLead {
        /// Form field as NAME=VALUE; repeatable.
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<FormField>,

        /// Tick the consent checkbox.
        #[arg(long)]
        consent: bool,

        /// Endpoint URL; overrides the config file.
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Print the reference catalogs, optionally filtered.
    Catalog {
        /// Case-insensitive name filter.
        #[arg(long)]
        search: Option<String>,
    },
}

/// Inputs for building a discharge plan.
#[derive(Debug, Clone, Default, Args)]
pub struct PlanArgs {
    /// Search text for the discharge port; must pick exactly one port.
    #[arg(long)]
    pub port: Option<String>,

    /// Search text for the vessel; must pick exactly one vessel.
    #[arg(long)]
    pub vessel: Option<String>,

    /// Gang schedule edit as ROW:FIELD=VALUE (rows start at 1,
    /// FIELD is gangs or cost); repeatable, applied after the port.
    #[arg(long = "row", value_name = "ROW:FIELD=VALUE")]
    pub row_edits: Vec<RowEdit>,

    /// Vessel edit as FIELD=VALUE (e.g. dock_cost=0.3); repeatable,
    /// applied after the vessel.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub vessel_edits: Vec<VesselEdit>,
}

// ─── argument values ─────────────────────────────────────────────────────────

fn split_assignment(s: &str) -> Result<(&str, &str), String> {
    s.split_once('=')
        .map(|(name, value)| (name.trim(), value))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))
}

/// One `--row` edit. `row` is zero-based once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEdit {
    pub row: usize,
    pub field: GangField,
    pub value: String,
}

impl FromStr for RowEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = split_assignment(s)?;
        let (row, field) = target
            .split_once(':')
            .ok_or_else(|| format!("expected ROW:FIELD=VALUE, got '{s}'"))?;
        let row: usize = row
            .trim()
            .parse()
            .map_err(|_| format!("invalid row number '{row}'"))?;
        if row == 0 {
            return Err("row numbers start at 1".to_string());
        }

        Ok(Self {
            row: row - 1,
            field: field.trim().parse()?,
            value: value.to_string(),
        })
    }
}

impl fmt::Display for RowEdit {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}={}", self.row + 1, self.field, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VesselEdit {
    pub field: VesselField,
    pub value: String,
}

impl FromStr for VesselEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = split_assignment(s)?;
        Ok(Self {
            field: field.parse()?,
            value: value.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = split_assignment(s)?;
        if name.is_empty() {
            return Err(format!("missing field name in '{s}'"));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}
