//! Dataset Loader - one-time CSV load of launch records
//!
//! The dataset is read once at startup and never mutated afterwards. Every
//! chart is a read-only projection of it.
//!
//! Required columns:
//! - `Launch Site`
//! - `Payload Mass (kg)`
//! - `class` (0 = failure, 1 = success)
//! - `Booster Version Category`
//!
//! Any other column in the file is ignored.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER: &str = "Booster Version Category";

const REQUIRED_COLUMNS: [&str; 4] = [COL_LAUNCH_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
    #[error("Malformed CSV in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },
    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn { source_name: String, column: String },
    #[error("{source_name}, line {line}: {reason}")]
    InvalidRow {
        source_name: String,
        line: u64,
        reason: String,
    },
}

/// Binary launch outcome, serialized as 0/1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    pub fn as_u8(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.as_u8()
    }
}

impl TryFrom<i64> for Outcome {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Outcome::Failure),
            1 => Ok(Outcome::Success),
            other => Err(format!("class must be 0 or 1, got {}", other)),
        }
    }
}

/// One row of the launch table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        outcome: Outcome,
        booster_version_category: impl Into<String>,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            outcome,
            booster_version_category: booster_version_category.into(),
        }
    }
}

/// Row shape as it appears in the file
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

/// Immutable in-memory launch table plus derived constants
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    sites: Vec<String>,
    min_payload: Option<f64>,
    max_payload: Option<f64>,
    loaded_at: DateTime<Local>,
}

impl Dataset {
    /// Load the dataset from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        tracing::info!("Loading launch dataset from {}", source_name);

        let file = std::fs::File::open(path).map_err(|error| DatasetError::Io {
            source_name: source_name.clone(),
            error,
        })?;
        let dataset = Self::from_reader(file, &source_name)?;

        tracing::info!(
            "Dataset loaded: {} records, {} sites, payload range {:?}..{:?} kg",
            dataset.len(),
            dataset.sites.len(),
            dataset.min_payload,
            dataset.max_payload
        );
        Ok(dataset)
    }

    /// Parse CSV content from any reader. `source_name` only labels errors.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, DatasetError> {
        let csv_err = |error: csv::Error| DatasetError::Csv {
            source_name: source_name.to_string(),
            error,
        };

        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers().map_err(csv_err)?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DatasetError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.to_string(),
                });
            }
        }
        tracing::debug!("CSV headers: {:?}", headers);

        let mut records = Vec::new();
        for result in rdr.records() {
            let raw = result.map_err(csv_err)?;
            // file line the record starts on, not the record index
            let line = raw.position().map(|p| p.line()).unwrap_or_default();
            let invalid = |reason: String| DatasetError::InvalidRow {
                source_name: source_name.to_string(),
                line,
                reason,
            };

            let row: CsvRow = raw
                .deserialize(Some(&headers))
                .map_err(|e| invalid(e.to_string()))?;
            records.push(validate_row(row).map_err(invalid)?);
        }

        Ok(Self::from_records(records))
    }

    /// Build a dataset from already-validated records
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        for record in &records {
            if !sites.iter().any(|s| s == &record.launch_site) {
                sites.push(record.launch_site.clone());
            }
        }

        let min_payload = records.iter().map(|r| r.payload_mass_kg).reduce(f64::min);
        let max_payload = records.iter().map(|r| r.payload_mass_kg).reduce(f64::max);

        Self {
            records,
            sites,
            min_payload,
            max_payload,
            loaded_at: Local::now(),
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct launch sites in order of first appearance
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Smallest payload in the file. Display only, never used for filtering.
    pub fn min_payload(&self) -> Option<f64> {
        self.min_payload
    }

    /// Largest payload in the file. Display only, never used for filtering.
    pub fn max_payload(&self) -> Option<f64> {
        self.max_payload
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }
}

fn validate_row(row: CsvRow) -> Result<LaunchRecord, String> {
    if row.launch_site.is_empty() {
        return Err(format!("empty '{}'", COL_LAUNCH_SITE));
    }
    if !row.payload_mass_kg.is_finite() || row.payload_mass_kg < 0.0 {
        return Err(format!(
            "'{}' must be a non-negative number, got {}",
            COL_PAYLOAD, row.payload_mass_kg
        ));
    }
    let outcome = Outcome::try_from(row.class)?;

    Ok(LaunchRecord::new(
        row.launch_site,
        row.payload_mass_kg,
        outcome,
        row.booster_version_category,
    ))
}
