//! Built-in reference catalogs of discharge ports and vessels.

use rust_decimal::Decimal;

use crate::models::{ReferencePort, ReferenceVessel};
use crate::search::{Named, filter_by_name};

/// Ports and vessels available for search/select in a planning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCatalog {
    pub ports: Vec<ReferencePort>,
    pub vessels: Vec<ReferenceVessel>,
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceCatalog {
    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self {
            ports: builtin_ports(),
            vessels: builtin_vessels(),
        }
    }

    /// Exact (case-insensitive) port lookup.
    pub fn find_port(
        &self,
        name: &str,
    ) -> Option<&ReferencePort> {
        find_exact(&self.ports, name)
    }

    /// Exact (case-insensitive) vessel lookup.
    pub fn find_vessel(
        &self,
        name: &str,
    ) -> Option<&ReferenceVessel> {
        find_exact(&self.vessels, name)
    }

    pub fn search_ports(
        &self,
        term: &str,
    ) -> Vec<&ReferencePort> {
        filter_by_name(&self.ports, term)
    }

    pub fn search_vessels(
        &self,
        term: &str,
    ) -> Vec<&ReferenceVessel> {
        filter_by_name(&self.vessels, term)
    }
}

fn find_exact<'a, T: Named>(
    entries: &'a [T],
    name: &str,
) -> Option<&'a T> {
    let wanted = name.trim().to_lowercase();
    entries
        .iter()
        .find(|entry| entry.name().to_lowercase() == wanted)
}

fn port(
    name: &str,
    gangs: u32,
    cost_per_gang: i64,
    bcmea_rate_cents: i64,
    discharge_tenths: i64,
    dock_cost_cents: i64,
) -> ReferencePort {
    ReferencePort {
        name: name.to_string(),
        gangs,
        cost_per_gang: Decimal::from(cost_per_gang),
        bcmea_rate: Decimal::new(bcmea_rate_cents, 2),
        discharge_days: Decimal::new(discharge_tenths, 1),
        dock_cost: Decimal::new(dock_cost_cents, 2),
    }
}

fn vessel(
    name: &str,
    tonnage: i64,
) -> ReferenceVessel {
    ReferenceVessel {
        name: name.to_string(),
        tonnage: Decimal::from(tonnage),
    }
}

pub fn builtin_ports() -> Vec<ReferencePort> {
    vec![
        port("Santos", 5, 13500, 327, 50, 25),
        port("Buenos Aires", 4, 14000, 315, 45, 22),
        port("Valparaíso", 6, 15000, 345, 60, 28),
        port("Callao", 3, 16000, 360, 30, 30),
        port("Guayaquil", 4, 13000, 310, 40, 20),
        port("Cartagena", 7, 14500, 335, 70, 26),
        port("Manzanillo", 5, 15500, 350, 50, 29),
        port("Puerto Limón", 4, 13500, 325, 40, 24),
        port("Rio de Janeiro", 6, 14200, 340, 60, 27),
        port("Montevideo", 3, 13800, 320, 30, 23),
    ]
}

pub fn builtin_vessels() -> Vec<ReferenceVessel> {
    vec![
        vessel("Steel Carrier Alpha", 20520),
        vessel("Steel Carrier Beta", 18500),
        vessel("Ocean Explorer", 22500),
        vessel("Maritime Express", 19500),
        vessel("Pacific Voyager", 21500),
        vessel("Atlantic Navigator", 17500),
        vessel("Global Trader", 23500),
        vessel("Cargo Master", 18500),
    ]
}
