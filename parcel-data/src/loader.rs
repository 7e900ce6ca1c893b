use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use parcel_core::ReferenceCatalog;
use parcel_core::models::{ReferencePort, ReferenceVessel};
use parcel_core::search::Named;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading reference catalogs.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot open {path}: {message}")]
    Io { path: String, message: String },

    #[error("The {0} catalog has no entries")]
    Empty(&'static str),

    #[error("Record {record} in the {kind} catalog has no name")]
    MissingName { kind: &'static str, record: usize },

    #[error("Duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Negative {field} for '{name}'")]
    NegativeValue { name: String, field: &'static str },
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of `ports.csv`.
///
/// - `name`: port name as shown in the search dropdown
/// - `gangs`: gangs per shift applied to every schedule row
/// - `cost_per_gang`: cost per gang applied to every schedule row
/// - `bcmea_rate`, `discharge_days`, `dock_cost`: copied into the vessel record
///
/// Amounts may use comma thousands separators (`"12,500"`).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PortRecord {
    pub name: String,
    pub gangs: u32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub cost_per_gang: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub bcmea_rate: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub discharge_days: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub dock_cost: Decimal,
}

/// A single row of `vessels.csv`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VesselRecord {
    pub name: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub tonnage: Decimal,
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim()
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(serde::de::Error::custom)
}

impl PortRecord {
    fn validate(&self) -> Result<(), CatalogLoaderError> {
        let amounts = [
            ("cost_per_gang", self.cost_per_gang),
            ("bcmea_rate", self.bcmea_rate),
            ("discharge_days", self.discharge_days),
            ("dock_cost", self.dock_cost),
        ];
        reject_negative(&self.name, &amounts)
    }
}

impl From<PortRecord> for ReferencePort {
    fn from(record: PortRecord) -> Self {
        ReferencePort {
            name: record.name,
            gangs: record.gangs,
            cost_per_gang: record.cost_per_gang,
            bcmea_rate: record.bcmea_rate,
            discharge_days: record.discharge_days,
            dock_cost: record.dock_cost,
        }
    }
}

impl VesselRecord {
    fn validate(&self) -> Result<(), CatalogLoaderError> {
        reject_negative(&self.name, &[("tonnage", self.tonnage)])
    }
}

impl From<VesselRecord> for ReferenceVessel {
    fn from(record: VesselRecord) -> Self {
        ReferenceVessel {
            name: record.name,
            tonnage: record.tonnage,
        }
    }
}

fn reject_negative(
    name: &str,
    amounts: &[(&'static str, Decimal)],
) -> Result<(), CatalogLoaderError> {
    match amounts.iter().find(|(_, value)| *value < Decimal::ZERO) {
        Some((field, _)) => Err(CatalogLoaderError::NegativeValue {
            name: name.to_string(),
            field: *field,
        }),
        None => Ok(()),
    }
}

/// Names must be present and unique, ignoring case and surrounding spaces,
/// since lookups by name ignore both.
fn check_names<T: Named>(
    kind: &'static str,
    entries: &[T],
) -> Result<(), CatalogLoaderError> {
    if entries.is_empty() {
        return Err(CatalogLoaderError::Empty(kind));
    }

    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let key = entry.name().trim().to_lowercase();
        if key.is_empty() {
            return Err(CatalogLoaderError::MissingName {
                kind,
                record: index + 1,
            });
        }
        if !seen.insert(key) {
            return Err(CatalogLoaderError::DuplicateName {
                kind,
                name: entry.name().to_string(),
            });
        }
    }
    Ok(())
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, CatalogLoaderError> {
    File::open(path).map_err(|e| CatalogLoaderError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Loader for port and vessel reference catalogs from CSV files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse and validate port records from a CSV reader.
    pub fn parse_ports<R: Read>(reader: R) -> Result<Vec<ReferencePort>, CatalogLoaderError> {
        let mut ports = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: PortRecord = result?;
            record.validate()?;
            ports.push(ReferencePort::from(record));
        }

        check_names("port", &ports)?;
        debug!(count = ports.len(), "parsed port catalog");
        Ok(ports)
    }

    /// Parse and validate vessel records from a CSV reader.
    pub fn parse_vessels<R: Read>(reader: R) -> Result<Vec<ReferenceVessel>, CatalogLoaderError> {
        let mut vessels = Vec::new();
        for result in csv_reader(reader).deserialize() {
            let record: VesselRecord = result?;
            record.validate()?;
            vessels.push(ReferenceVessel::from(record));
        }

        check_names("vessel", &vessels)?;
        debug!(count = vessels.len(), "parsed vessel catalog");
        Ok(vessels)
    }

    pub fn load_ports_file(path: &Path) -> Result<Vec<ReferencePort>, CatalogLoaderError> {
        Self::parse_ports(open(path)?)
    }

    pub fn load_vessels_file(path: &Path) -> Result<Vec<ReferenceVessel>, CatalogLoaderError> {
        Self::parse_vessels(open(path)?)
    }

    /// Builds a catalog, replacing each built-in list whose file is given.
    pub fn load_catalog(
        ports_csv: Option<&Path>,
        vessels_csv: Option<&Path>,
    ) -> Result<ReferenceCatalog, CatalogLoaderError> {
        let mut catalog = ReferenceCatalog::builtin();

        if let Some(path) = ports_csv {
            catalog.ports = Self::load_ports_file(path)?;
            info!(path = %path.display(), count = catalog.ports.len(), "loaded port catalog");
        }
        if let Some(path) = vessels_csv {
            catalog.vessels = Self::load_vessels_file(path)?;
            info!(path = %path.display(), count = catalog.vessels.len(), "loaded vessel catalog");
        }

        Ok(catalog)
    }
}
